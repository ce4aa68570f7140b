pub mod message;
pub mod outcome;
pub mod phone;
pub mod record;
pub mod roster;
pub mod timing;

pub use message::{message_hash, Message};
pub use outcome::{DispatchOutcome, SkipReason};
pub use phone::{is_valid_number, normalize_number, CanonicalNumber, RejectReason};
pub use record::DispatchRecord;
pub use roster::{partition_numbers, RejectedNumber, Roster};
pub use timing::Timing;
