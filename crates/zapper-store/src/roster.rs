use crate::error::{Result, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use zapper_core::Roster;

const NUMBER_COLUMNS: [&str; 3] = ["numero", "number", "phone"];
const BOM: char = '\u{feff}';

/// Loads the numbers to message from a CSV file with a header row.
///
/// Blank cells are ignored. Entries that do not normalize into a valid
/// number end up in [`Roster::rejected`].
pub fn load_roster(path: &Path) -> Result<Roster> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StoreError::MissingRoster(path.to_path_buf()))
        }
        Err(err) => return Err(err.into()),
    };
    let roster = parse_roster(&contents).map_err(|reason| StoreError::InvalidRoster {
        path: path.to_path_buf(),
        reason,
    })?;
    if roster.is_empty() {
        return Err(StoreError::EmptyRoster(path.to_path_buf()));
    }
    Ok(roster)
}

/// Parses roster CSV text. Quoted fields may span several lines.
pub fn parse_roster(contents: &str) -> std::result::Result<Roster, String> {
    let mut rows = split_rows(contents).into_iter();
    let header = rows
        .next()
        .ok_or_else(|| "missing header row".to_string())?;
    let column = header
        .iter()
        .position(|name| {
            let name = name.trim_start_matches(BOM).trim().to_ascii_lowercase();
            NUMBER_COLUMNS.contains(&name.as_str())
        })
        .ok_or_else(|| format!("missing column '{}'", NUMBER_COLUMNS[0]))?;

    let mut roster = Roster::default();
    for fields in rows {
        let Some(raw) = fields.get(column).map(|value| value.trim()) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        roster.push_raw(raw);
    }
    Ok(roster)
}

/// Splits CSV text into rows of fields. Rows where every field is blank
/// are dropped.
fn split_rows(contents: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = contents.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => row.push(std::mem::take(&mut current)),
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                row.push(std::mem::take(&mut current));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => current.push(ch),
        }
    }
    row.push(current);
    push_row(&mut rows, row);
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|field| !field.trim().is_empty()) {
        rows.push(row);
    }
}
