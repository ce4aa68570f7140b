use crate::commands::print_json;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use zapper_core::{CanonicalNumber, RejectReason};

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    #[arg(required = true)]
    pub numbers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NormalizedEntry {
    input: String,
    number: Option<CanonicalNumber>,
    rejected: Option<RejectReason>,
}

pub fn normalize(json: bool, args: NormalizeArgs) -> Result<()> {
    let entries: Vec<NormalizedEntry> = args
        .numbers
        .into_iter()
        .map(|input| match CanonicalNumber::classify(&input) {
            Ok(number) => NormalizedEntry {
                input,
                number: Some(number),
                rejected: None,
            },
            Err(reason) => NormalizedEntry {
                input,
                number: None,
                rejected: Some(reason),
            },
        })
        .collect();

    if json {
        return print_json(&entries);
    }

    for entry in entries {
        match (entry.number, entry.rejected) {
            (Some(number), _) => println!("{} -> {}", entry.input, number),
            (None, Some(reason)) => println!("{} -> invalid ({})", entry.input, reason),
            (None, None) => {}
        }
    }
    Ok(())
}
