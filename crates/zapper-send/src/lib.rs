pub mod batch;
pub mod delivery;
pub mod error;
pub mod pace;
pub mod report;

pub use batch::{BatchOptions, BatchRequest, Dispatcher};
pub use delivery::{CommandDelivery, Delivery, DryRunDelivery};
pub use error::{Result, SendError};
pub use pace::{NoPause, Pacer, ThreadPacer};
pub use report::{BatchReport, NumberResult};
