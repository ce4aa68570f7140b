use thiserror::Error;
use zapper_store::StoreError;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("delivery command {program} failed ({status}): {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("delivery unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SendError>;
