use crate::delivery::Delivery;
use crate::error::Result;
use crate::pace::Pacer;
use crate::report::BatchReport;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use zapper_core::{CanonicalNumber, DispatchOutcome, DispatchRecord, Message, SkipReason, Timing};
use zapper_store::{DispatchLog, ExternalHistory};

/// Per-call switches for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Send even to numbers already in the dispatch log.
    pub ignore_local_log: bool,
    /// Send even to numbers the delivery helper lists in its history.
    pub ignore_external_history: bool,
    /// Append a record for every successful delivery.
    pub record: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            ignore_local_log: false,
            ignore_external_history: false,
            record: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    pub numbers: &'a [CanonicalNumber],
    pub message: &'a Message,
    pub timing: Timing,
    pub options: BatchOptions,
}

struct Channel<D, P> {
    delivery: D,
    pacer: P,
}

/// Sends messages one recipient at a time.
///
/// The delivery backend sits behind a mutex held for the whole of
/// [`Dispatcher::run_batch`] and [`Dispatcher::send_one`], so callers that
/// share a dispatcher never interleave sends.
pub struct Dispatcher<D, P> {
    log: DispatchLog,
    history_path: PathBuf,
    channel: Mutex<Channel<D, P>>,
}

impl<D: Delivery, P: Pacer> Dispatcher<D, P> {
    pub fn new(delivery: D, pacer: P, log: DispatchLog, history_path: impl Into<PathBuf>) -> Self {
        Self {
            log,
            history_path: history_path.into(),
            channel: Mutex::new(Channel { delivery, pacer }),
        }
    }

    pub fn log(&self) -> &DispatchLog {
        &self.log
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub fn into_parts(self) -> (D, P) {
        let channel = self
            .channel
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        (channel.delivery, channel.pacer)
    }

    /// Classifies every number of the request and delivers to the ones that
    /// are not skipped. `on_result` sees each number as soon as it is done.
    ///
    /// Only reading the log or the history can fail the call, and both
    /// happen before the first delivery. Delivery errors are reported per
    /// number and never stop the batch.
    pub fn run_batch<F>(&self, request: &BatchRequest<'_>, mut on_result: F) -> Result<BatchReport>
    where
        F: FnMut(&CanonicalNumber, &DispatchOutcome),
    {
        let mut channel = self.lock();

        let logged = if request.options.ignore_local_log {
            HashSet::new()
        } else {
            self.log.sent_numbers()?
        };
        let history = if request.options.ignore_external_history {
            ExternalHistory::default()
        } else {
            ExternalHistory::load(&self.history_path)?
        };
        debug!(
            logged = logged.len(),
            history = history.len(),
            numbers = request.numbers.len(),
            "batch starting"
        );

        let mut report = BatchReport::new(request.timing, request.message.hash());
        let mut seen: HashSet<&CanonicalNumber> = HashSet::new();
        let mut attempts = 0usize;

        for number in request.numbers {
            let outcome = if !seen.insert(number) {
                DispatchOutcome::Skipped(SkipReason::Duplicate)
            } else if history.contains(number.as_str()) {
                DispatchOutcome::Skipped(SkipReason::ExternalHistory)
            } else if logged.contains(number.as_str()) {
                DispatchOutcome::Skipped(SkipReason::LocalLog)
            } else {
                if attempts > 0 {
                    channel.pacer.pause(request.timing.interval());
                }
                attempts += 1;
                self.attempt(
                    &mut channel,
                    number,
                    request.message,
                    &request.timing,
                    request.options.record,
                )
            };

            if let DispatchOutcome::Skipped(reason) = &outcome {
                info!(number = %number, reason = %reason, "skipped");
            }
            on_result(number, &outcome);
            report.push(number, outcome);
        }

        info!(
            sent = report.sent.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        Ok(report)
    }

    /// Delivers to a single number without consulting the log or history.
    pub fn send_one(
        &self,
        number: &CanonicalNumber,
        message: &Message,
        timing: &Timing,
        record: bool,
    ) -> DispatchOutcome {
        let mut channel = self.lock();
        self.attempt(&mut channel, number, message, timing, record)
    }

    fn lock(&self) -> MutexGuard<'_, Channel<D, P>> {
        self.channel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn attempt(
        &self,
        channel: &mut Channel<D, P>,
        number: &CanonicalNumber,
        message: &Message,
        timing: &Timing,
        record: bool,
    ) -> DispatchOutcome {
        info!(number = %number, backend = channel.delivery.name(), "sending");
        if let Err(err) = channel.delivery.send(number, message, timing) {
            warn!(number = %number, error = %err, "delivery failed");
            return DispatchOutcome::Failed(err.to_string());
        }

        if record {
            if let Err(err) = self.log.append(&DispatchRecord::new(number, message)) {
                warn!(number = %number, error = %err, "failed to record dispatch");
                return DispatchOutcome::Failed(format!("failed to record dispatch: {err}"));
            }
        }
        DispatchOutcome::Sent
    }
}
