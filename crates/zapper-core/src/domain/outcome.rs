use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Number already appeared earlier in the same batch.
    Duplicate,
    /// The delivery helper's own history lists the number.
    ExternalHistory,
    /// The dispatch log already holds a record for the number.
    LocalLog,
}

impl SkipReason {
    pub fn label(self) -> &'static str {
        match self {
            SkipReason::Duplicate => "duplicado",
            SkipReason::ExternalHistory => "historico_pywhatkit",
            SkipReason::LocalLog => "log_local",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// What happened to one number of a batch. Every number gets exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    Skipped(SkipReason),
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DispatchOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DispatchOutcome::Failed(_))
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Sent => f.write_str("enviado"),
            DispatchOutcome::Skipped(reason) => write!(f, "pulado: {reason}"),
            DispatchOutcome::Failed(message) => write!(f, "erro: {message}"),
        }
    }
}

impl Serialize for DispatchOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
