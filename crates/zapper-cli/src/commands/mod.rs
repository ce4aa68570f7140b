use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use zapper_config::AppConfig;

pub mod completions;
pub mod defaults;
pub mod log;
pub mod normalize;
pub mod send;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
    pub log_path: PathBuf,
    pub history_path: PathBuf,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
