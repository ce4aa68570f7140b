use std::path::PathBuf;
use thiserror::Error;
use zapper_core::CoreError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("message file not found: {0}")]
    MissingMessageSource(PathBuf),
    #[error("message file is empty: {0}")]
    EmptyMessageSource(PathBuf),
    #[error("roster file not found: {0}")]
    MissingRoster(PathBuf),
    #[error("invalid roster {path}: {reason}")]
    InvalidRoster { path: PathBuf, reason: String },
    #[error("no valid numbers in roster: {0}")]
    EmptyRoster(PathBuf),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Json,
    Core,
    MissingHomeDir,
    InvalidDataPath,
    MissingMessageSource,
    EmptyMessageSource,
    MissingRoster,
    InvalidRoster,
    EmptyRoster,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Json(_) => StoreErrorKind::Json,
            StoreError::Core(_) => StoreErrorKind::Core,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::MissingMessageSource(_) => StoreErrorKind::MissingMessageSource,
            StoreError::EmptyMessageSource(_) => StoreErrorKind::EmptyMessageSource,
            StoreError::MissingRoster(_) => StoreErrorKind::MissingRoster,
            StoreError::InvalidRoster { .. } => StoreErrorKind::InvalidRoster,
            StoreError::EmptyRoster(_) => StoreErrorKind::EmptyRoster,
        }
    }
}
