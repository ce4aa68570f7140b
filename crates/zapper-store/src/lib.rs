pub mod error;
pub mod history;
pub mod log;
pub mod message;
pub mod paths;
pub mod roster;

pub use error::{Result, StoreError, StoreErrorKind};
pub use history::ExternalHistory;
pub use log::DispatchLog;
pub use message::load_message;
pub use roster::load_roster;
