use serde::Serialize;
use zapper_core::{CanonicalNumber, DispatchOutcome, SkipReason, Timing};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberResult {
    pub number: CanonicalNumber,
    pub outcome: DispatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub number: CanonicalNumber,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    pub number: CanonicalNumber,
    pub error: String,
}

/// Everything one batch did, in input order plus grouped by outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub timing: Timing,
    pub message_hash: String,
    pub results: Vec<NumberResult>,
    pub sent: Vec<CanonicalNumber>,
    pub skipped: Vec<SkippedEntry>,
    pub failed: Vec<FailedEntry>,
}

impl BatchReport {
    pub fn new(timing: Timing, message_hash: String) -> Self {
        Self {
            timing,
            message_hash,
            results: Vec::new(),
            sent: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn push(&mut self, number: &CanonicalNumber, outcome: DispatchOutcome) {
        match &outcome {
            DispatchOutcome::Sent => self.sent.push(number.clone()),
            DispatchOutcome::Skipped(reason) => self.skipped.push(SkippedEntry {
                number: number.clone(),
                reason: *reason,
            }),
            DispatchOutcome::Failed(error) => self.failed.push(FailedEntry {
                number: number.clone(),
                error: error.clone(),
            }),
        }
        self.results.push(NumberResult {
            number: number.clone(),
            outcome,
        });
    }

    pub fn outcome_for(&self, number: &CanonicalNumber) -> Option<&DispatchOutcome> {
        self.results
            .iter()
            .find(|result| &result.number == number)
            .map(|result| &result.outcome)
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
