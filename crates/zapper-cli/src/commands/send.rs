use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use zapper_core::{
    partition_numbers, CanonicalNumber, DispatchOutcome, Message, RejectedNumber, Roster, Timing,
};
use zapper_send::{
    BatchOptions, BatchReport, BatchRequest, CommandDelivery, Delivery, Dispatcher,
    DryRunDelivery, NoPause, Pacer, ThreadPacer,
};
use zapper_store::{load_message, load_roster, DispatchLog};

#[derive(Debug, Args)]
pub struct MessageArgs {
    /// Message text; overrides --message-file
    #[arg(long, conflicts_with = "message_file")]
    pub message: Option<String>,
    /// Text file holding the message
    #[arg(long)]
    pub message_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TimingArgs {
    /// Seconds the helper waits for the chat to open
    #[arg(long)]
    pub wait: Option<u64>,
    /// Seconds to pause between two deliveries
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// CSV roster with a `numero` column
    #[arg(long, conflicts_with = "numbers")]
    pub file: Option<PathBuf>,
    /// Send to this number instead of a roster (repeatable)
    #[arg(long = "number", value_name = "NUMBER")]
    pub numbers: Vec<String>,
    #[command(flatten)]
    pub message: MessageArgs,
    #[command(flatten)]
    pub timing: TimingArgs,
    /// Ignore the dispatch log and the helper history
    #[arg(long)]
    pub force_resend: bool,
    /// Ignore only the helper history
    #[arg(long)]
    pub ignore_history: bool,
    /// Do not append to the dispatch log
    #[arg(long)]
    pub no_record: bool,
    /// Go through the batch without contacting anyone or writing the log
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct SendOneArgs {
    pub number: String,
    #[command(flatten)]
    pub message: MessageArgs,
    #[command(flatten)]
    pub timing: TimingArgs,
    #[arg(long)]
    pub no_record: bool,
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct SendReport {
    #[serde(flatten)]
    batch: BatchReport,
    rejected: Vec<RejectedNumber>,
    dry_run: bool,
}

#[derive(Debug, Serialize)]
struct SendOneReport<'a> {
    number: &'a CanonicalNumber,
    outcome: &'a DispatchOutcome,
    timing: Timing,
    dry_run: bool,
}

type CliDispatcher = Dispatcher<Box<dyn Delivery>, Box<dyn Pacer>>;

pub fn send_batch(ctx: &Context<'_>, args: SendArgs) -> Result<()> {
    let roster = load_numbers(ctx, &args)?;
    let message = resolve_message(ctx, &args.message)?;
    let timing = resolve_timing(ctx, &args.timing);
    let dispatcher = build_dispatcher(ctx, args.dry_run)?;

    if !ctx.json {
        for rejected in &roster.rejected {
            println!("Ignoring invalid number '{}': {}", rejected.raw, rejected.reason);
        }
    }

    let options = BatchOptions {
        ignore_local_log: args.force_resend,
        ignore_external_history: args.force_resend || args.ignore_history,
        record: !args.no_record && !args.dry_run,
    };
    debug!(?options, ?timing, numbers = roster.accepted.len(), "starting batch");

    let request = BatchRequest {
        numbers: &roster.accepted,
        message: &message,
        timing,
        options,
    };
    let json = ctx.json;
    let batch = dispatcher
        .run_batch(&request, |number, outcome| {
            if !json {
                println!("{number}: {outcome}");
            }
        })
        .with_context(|| "run batch")?;

    if ctx.json {
        return print_json(&SendReport {
            batch,
            rejected: roster.rejected,
            dry_run: args.dry_run,
        });
    }

    println!(
        "Sent {}, skipped {}, failed {}",
        batch.sent.len(),
        batch.skipped.len(),
        batch.failed.len()
    );
    Ok(())
}

pub fn send_one(ctx: &Context<'_>, args: SendOneArgs) -> Result<()> {
    let number = CanonicalNumber::parse(&args.number)?;
    let message = resolve_message(ctx, &args.message)?;
    let timing = resolve_timing(ctx, &args.timing);
    let dispatcher = build_dispatcher(ctx, args.dry_run)?;

    let record = !args.no_record && !args.dry_run;
    let outcome = dispatcher.send_one(&number, &message, &timing, record);

    if ctx.json {
        print_json(&SendOneReport {
            number: &number,
            outcome: &outcome,
            timing,
            dry_run: args.dry_run,
        })?;
    } else {
        println!("{number}: {outcome}");
    }

    match outcome {
        DispatchOutcome::Failed(error) => Err(anyhow!("delivery to {number} failed: {error}")),
        _ => Ok(()),
    }
}

fn load_numbers(ctx: &Context<'_>, args: &SendArgs) -> Result<Roster> {
    if !args.numbers.is_empty() {
        let roster = partition_numbers(&args.numbers);
        if roster.is_empty() {
            return Err(invalid_input(
                "no valid number given; use the +5511999999999 format",
            ));
        }
        return Ok(roster);
    }

    let path = args
        .file
        .clone()
        .unwrap_or_else(|| ctx.config.paths.roster.clone());
    load_roster(&path).with_context(|| format!("load roster {}", path.display()))
}

fn resolve_message(ctx: &Context<'_>, args: &MessageArgs) -> Result<Message> {
    if let Some(text) = args.message.as_deref() {
        return Ok(Message::new(text)?);
    }
    let path = args
        .message_file
        .clone()
        .unwrap_or_else(|| ctx.config.paths.message.clone());
    load_message(&path).with_context(|| format!("load message {}", path.display()))
}

fn resolve_timing(ctx: &Context<'_>, args: &TimingArgs) -> Timing {
    let mut timing = ctx.config.timing;
    if let Some(wait) = args.wait {
        timing = timing.with_wait(wait);
    }
    if let Some(interval) = args.interval {
        timing = timing.with_interval(interval);
    }
    timing
}

fn build_dispatcher(ctx: &Context<'_>, dry_run: bool) -> Result<CliDispatcher> {
    let (delivery, pacer): (Box<dyn Delivery>, Box<dyn Pacer>) = if dry_run {
        (Box::new(DryRunDelivery::new()), Box::new(NoPause))
    } else {
        let program = ctx.config.delivery.program.clone().ok_or_else(|| {
            invalid_input(
                "no delivery program configured; set [delivery] program in the config file or pass --dry-run",
            )
        })?;
        let args = ctx.config.delivery.args.clone();
        (
            Box::new(CommandDelivery::new(program, args)),
            Box::new(ThreadPacer),
        )
    };

    Ok(Dispatcher::new(
        delivery,
        pacer,
        DispatchLog::open(&ctx.log_path),
        &ctx.history_path,
    ))
}
