use crate::domain::phone::RejectReason;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid number '{raw}': {reason}")]
    InvalidNumber { raw: String, reason: RejectReason },
    #[error("message is empty")]
    EmptyMessage,
}
