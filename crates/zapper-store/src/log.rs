use crate::error::Result;
use crate::paths;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str;
use zapper_core::{CanonicalNumber, DispatchRecord};

/// Append-only JSON Lines file of numbers that already got a message.
///
/// Records are never rewritten. Lines that are not valid UTF-8 JSON are
/// skipped on read so a torn last line never blocks a batch.
#[derive(Debug, Clone)]
pub struct DispatchLog {
    path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSnapshot {
    pub records: Vec<DispatchRecord>,
    pub skipped_lines: usize,
}

impl LogSnapshot {
    pub fn numbers(&self) -> HashSet<String> {
        self.records
            .iter()
            .map(|record| record.number.clone())
            .collect()
    }
}

impl DispatchLog {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<LogSnapshot> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LogSnapshot::default()),
            Err(err) => return Err(err.into()),
        };

        let mut snapshot = LogSnapshot::default();
        for line in bytes.split(|byte| *byte == b'\n') {
            let Ok(line) = str::from_utf8(line) else {
                snapshot.skipped_lines += 1;
                continue;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<DispatchRecord>(line) {
                Ok(record) => snapshot.records.push(record),
                Err(_) => snapshot.skipped_lines += 1,
            }
        }
        Ok(snapshot)
    }

    pub fn records(&self) -> Result<Vec<DispatchRecord>> {
        Ok(self.read()?.records)
    }

    pub fn sent_numbers(&self) -> Result<HashSet<String>> {
        Ok(self.read()?.numbers())
    }

    pub fn contains(&self, number: &CanonicalNumber) -> Result<bool> {
        Ok(self
            .read()?
            .records
            .iter()
            .any(|record| record.number == number.as_str()))
    }

    pub fn append(&self, record: &DispatchRecord) -> Result<()> {
        paths::ensure_parent_dir(&self.path)?;
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
