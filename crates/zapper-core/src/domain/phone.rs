use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_COUNTRY_CODE: &str = "55";
pub const MIN_DIGITS: usize = 11;

/// A phone number in `+<digits>` form with at least [`MIN_DIGITS`] digits.
///
/// The only way to build one is through [`CanonicalNumber::parse`], so two
/// values compare equal exactly when they refer to the same recipient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalNumber(String);

impl CanonicalNumber {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::classify(raw).map_err(|reason| CoreError::InvalidNumber {
            raw: raw.to_string(),
            reason,
        })
    }

    pub fn classify(raw: &str) -> Result<Self, RejectReason> {
        let normalized = normalize_number(raw);
        if normalized.is_empty() {
            return Err(RejectReason::NoDigits);
        }
        if !is_valid_number(&normalized) {
            return Err(RejectReason::TooShort);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CanonicalNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        CanonicalNumber::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NoDigits,
    TooShort,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoDigits => f.write_str("no digits"),
            RejectReason::TooShort => write!(f, "fewer than {MIN_DIGITS} digits"),
        }
    }
}

/// Rewrites user-entered phone text into `+<digits>` form.
///
/// Returns an empty string when the input has no digits at all. A leading
/// `00` international prefix is dropped; numbers typed without a country
/// code get [`DEFAULT_COUNTRY_CODE`] when they have exactly eleven digits.
pub fn normalize_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    let digits = digits.strip_prefix("00").unwrap_or(&digits);

    if raw.trim().starts_with('+') || digits.starts_with(DEFAULT_COUNTRY_CODE) {
        return format!("+{digits}");
    }
    if digits.len() == MIN_DIGITS {
        return format!("+{DEFAULT_COUNTRY_CODE}{digits}");
    }
    format!("+{digits}")
}

pub fn is_valid_number(value: &str) -> bool {
    if !value.starts_with('+') {
        return false;
    }
    value.chars().filter(|ch| ch.is_ascii_digit()).count() >= MIN_DIGITS
}
