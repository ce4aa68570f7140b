use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::warn;
use zapper_core::CanonicalNumber;
use zapper_store::DispatchLog;

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    /// List every dispatch record
    List(ListArgs),
    /// Tell whether a number already got a message
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show records for this number
    #[arg(long)]
    pub number: Option<String>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    pub number: String,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    number: &'a CanonicalNumber,
    logged: bool,
}

pub fn list_records(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let filter = args
        .number
        .as_deref()
        .map(CanonicalNumber::parse)
        .transpose()?;
    let log = DispatchLog::open(&ctx.log_path);
    let snapshot = log
        .read()
        .with_context(|| format!("read dispatch log {}", log.path().display()))?;
    if snapshot.skipped_lines > 0 {
        warn!(
            skipped = snapshot.skipped_lines,
            path = %log.path().display(),
            "ignored unreadable log lines"
        );
    }

    let records: Vec<_> = snapshot
        .records
        .into_iter()
        .filter(|record| match &filter {
            Some(number) => record.number == number.as_str(),
            None => true,
        })
        .collect();

    if ctx.json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("No dispatch records.");
        return Ok(());
    }
    for record in records {
        let hash = record.message_hash.get(..12).unwrap_or(&record.message_hash);
        println!("{}  {}", record.number, hash);
    }
    Ok(())
}

pub fn check_number(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let number = CanonicalNumber::parse(&args.number)?;
    let log = DispatchLog::open(&ctx.log_path);
    let logged = log
        .contains(&number)
        .with_context(|| format!("read dispatch log {}", log.path().display()))?;

    if ctx.json {
        return print_json(&CheckReport {
            number: &number,
            logged,
        });
    }

    if logged {
        println!("{number}: already sent");
    } else {
        println!("{number}: not sent");
    }
    Ok(())
}
