use crate::domain::phone::{CanonicalNumber, RejectReason};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedNumber {
    pub raw: String,
    pub reason: RejectReason,
}

/// Numbers to message, in input order. Repeats are kept so the batch can
/// report them as duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub accepted: Vec<CanonicalNumber>,
    pub rejected: Vec<RejectedNumber>,
}

impl Roster {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn push_raw(&mut self, raw: &str) {
        match CanonicalNumber::classify(raw) {
            Ok(number) => self.accepted.push(number),
            Err(reason) => self.rejected.push(RejectedNumber {
                raw: raw.to_string(),
                reason,
            }),
        }
    }
}

pub fn partition_numbers<I, S>(raws: I) -> Roster
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut roster = Roster::default();
    for raw in raws {
        roster.push_raw(raw.as_ref());
    }
    roster
}
