use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const PHONE_PREFIX: &str = "Phone Number:";

/// Numbers found in the delivery helper's own history file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalHistory {
    numbers: HashSet<String>,
}

impl ExternalHistory {
    /// Reads the history file. A missing file is an empty history and
    /// undecodable bytes are replaced rather than rejected.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn parse(contents: &str) -> Self {
        let numbers = contents
            .lines()
            .filter_map(|line| line.strip_prefix(PHONE_PREFIX))
            .map(str::trim)
            .filter(|number| !number.is_empty())
            .map(str::to_string)
            .collect();
        Self { numbers }
    }

    pub fn contains(&self, number: &str) -> bool {
        self.numbers.contains(number)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}
