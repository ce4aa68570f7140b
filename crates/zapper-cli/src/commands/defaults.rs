use crate::commands::{print_json, Context};
use anyhow::Result;
use serde::Serialize;
use zapper_core::Timing;
use zapper_store::load_message;

#[derive(Debug, Serialize)]
struct DefaultsReport {
    #[serde(flatten)]
    timing: Timing,
    message: Option<String>,
    message_error: Option<String>,
    log_path: String,
    history_path: String,
    delivery_program: Option<String>,
}

/// Shows what a plain `send` would use. A broken default message is
/// reported, not treated as an error.
pub fn show_defaults(ctx: &Context<'_>) -> Result<()> {
    let (message, message_error) = match load_message(&ctx.config.paths.message) {
        Ok(message) => (Some(message.as_str().to_string()), None),
        Err(err) => (None, Some(err.to_string())),
    };
    let report = DefaultsReport {
        timing: ctx.config.timing,
        message,
        message_error,
        log_path: ctx.log_path.display().to_string(),
        history_path: ctx.history_path.display().to_string(),
        delivery_program: ctx.config.delivery.program.clone(),
    };

    if ctx.json {
        return print_json(&report);
    }

    println!("wait: {}s", report.timing.wait_seconds);
    println!("interval: {}s", report.timing.interval_seconds);
    println!(
        "close tab: {} (after {}s)",
        report.timing.tab_close, report.timing.close_seconds
    );
    println!("log: {}", report.log_path);
    println!("history: {}", report.history_path);
    println!(
        "delivery: {}",
        report.delivery_program.as_deref().unwrap_or("(not configured)")
    );
    match (report.message, report.message_error) {
        (Some(message), _) => println!("message:\n{message}"),
        (None, Some(error)) => println!("message unavailable: {error}"),
        (None, None) => {}
    }
    Ok(())
}
