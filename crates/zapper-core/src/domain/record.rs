use crate::domain::message::Message;
use crate::domain::phone::CanonicalNumber;
use serde::{Deserialize, Serialize};

/// One line of the dispatch log. Field names are part of the file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRecord {
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "msg_hash", default)]
    pub message_hash: String,
}

impl DispatchRecord {
    pub fn new(number: &CanonicalNumber, message: &Message) -> Self {
        Self {
            number: number.as_str().to_string(),
            message_hash: message.hash(),
        }
    }
}
