use crate::error::{Result, SendError};
use std::io::ErrorKind;
use std::process::Command;
use zapper_core::{CanonicalNumber, Message, Timing};

/// Positional arguments handed to the delivery program when none are
/// configured.
pub const DEFAULT_ARGS: [&str; 5] = ["{number}", "{message}", "{wait}", "{tab_close}", "{close}"];

/// Something that can put one message in front of one recipient.
pub trait Delivery {
    fn name(&self) -> &str;
    fn send(
        &mut self,
        number: &CanonicalNumber,
        message: &Message,
        timing: &Timing,
    ) -> Result<()>;
}

impl<T: Delivery + ?Sized> Delivery for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(
        &mut self,
        number: &CanonicalNumber,
        message: &Message,
        timing: &Timing,
    ) -> Result<()> {
        (**self).send(number, message, timing)
    }
}

/// Accepts every send without contacting anyone.
#[derive(Debug, Clone, Default)]
pub struct DryRunDelivery {
    sent: Vec<CanonicalNumber>,
}

impl DryRunDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[CanonicalNumber] {
        &self.sent
    }
}

impl Delivery for DryRunDelivery {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn send(
        &mut self,
        number: &CanonicalNumber,
        _message: &Message,
        _timing: &Timing,
    ) -> Result<()> {
        self.sent.push(number.clone());
        Ok(())
    }
}

/// Runs an external helper program once per recipient.
///
/// Each argument is a template; `{number}`, `{message}`, `{wait}`,
/// `{tab_close}` and `{close}` are replaced before the program starts. A
/// non-zero exit status counts as a failed delivery.
#[derive(Debug, Clone)]
pub struct CommandDelivery {
    program: String,
    args: Vec<String>,
}

impl CommandDelivery {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let args = if args.is_empty() {
            DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect()
        } else {
            args
        };
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn render_args(
        &self,
        number: &CanonicalNumber,
        message: &Message,
        timing: &Timing,
    ) -> Vec<String> {
        let wait = timing.wait_seconds.to_string();
        let close = timing.close_seconds.to_string();
        let tab_close = timing.tab_close.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{number}", number.as_str())
                    .replace("{wait}", &wait)
                    .replace("{close}", &close)
                    .replace("{tab_close}", &tab_close)
                    .replace("{message}", message.as_str())
            })
            .collect()
    }
}

impl Delivery for CommandDelivery {
    fn name(&self) -> &str {
        &self.program
    }

    fn send(
        &mut self,
        number: &CanonicalNumber,
        message: &Message,
        timing: &Timing,
    ) -> Result<()> {
        let output = Command::new(&self.program)
            .args(self.render_args(number, message, timing))
            .output()
            .map_err(|err| {
                if err.kind() == ErrorKind::NotFound {
                    SendError::Unavailable(format!("program not found: {}", self.program))
                } else {
                    SendError::Io(err)
                }
            })?;

        if !output.status.success() {
            return Err(SendError::Command {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
