use crate::error::{Result, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use zapper_core::Message;

pub fn load_message(path: &Path) -> Result<Message> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StoreError::MissingMessageSource(path.to_path_buf()))
        }
        Err(err) => return Err(err.into()),
    };
    Message::new(&contents).map_err(|_| StoreError::EmptyMessageSource(path.to_path_buf()))
}
