mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, defaults, log, normalize, send, Context};
use crate::error::{exit_code_for, report_error};
use zapper_config as config;
use zapper_store::paths;

#[derive(Debug, Parser)]
#[command(name = "zapper", version, about = "Send paced WhatsApp messages without repeating recipients")]
struct Cli {
    /// Config file; defaults to $XDG_CONFIG_HOME/zapper/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Dispatch log file (JSON Lines)
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,
    /// Delivery helper history file
    #[arg(long, global = true)]
    history_path: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one message to every number of a roster
    Send(send::SendArgs),
    /// Send one message to a single number, ignoring the log
    #[command(name = "send-one")]
    SendOne(send::SendOneArgs),
    /// Print the canonical form of phone numbers
    Normalize(normalize::NormalizeArgs),
    #[command(subcommand)]
    Log(log::LogCommand),
    /// Show effective timing and the default message
    Defaults,
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        log_path,
        history_path,
        json,
        verbose: _,
        command,
    } = cli;
    let overrides = PathOverrides {
        config: config_path,
        log: log_path,
        history: history_path,
    };

    match command {
        Command::Completions(args) => completions::emit(args),
        Command::Normalize(args) => normalize::normalize(json, args),
        Command::Send(args) => with_context(json, overrides, |ctx| send::send_batch(ctx, args)),
        Command::SendOne(args) => with_context(json, overrides, |ctx| send::send_one(ctx, args)),
        Command::Log(log::LogCommand::List(args)) => {
            with_context(json, overrides, |ctx| log::list_records(ctx, args))
        }
        Command::Log(log::LogCommand::Check(args)) => {
            with_context(json, overrides, |ctx| log::check_number(ctx, args))
        }
        Command::Defaults => with_context(json, overrides, defaults::show_defaults),
    }
}

struct PathOverrides {
    config: Option<PathBuf>,
    log: Option<PathBuf>,
    history: Option<PathBuf>,
}

/// Loads the config file and resolves file locations, then hands the
/// result to a command. Flags win over the config file.
fn with_context<F>(json: bool, overrides: PathOverrides, command: F) -> Result<()>
where
    F: FnOnce(&Context<'_>) -> Result<()>,
{
    let app_config = config::load(overrides.config.clone()).with_context(|| "load config")?;
    if let Ok(path) = config::resolve_config_path(overrides.config) {
        debug!(path = %path.display(), found = path.exists(), "config");
    }

    let log_path = paths::resolve_log_path(overrides.log.or_else(|| app_config.paths.log.clone()))
        .with_context(|| "resolve dispatch log path")?;
    let history_path = overrides
        .history
        .unwrap_or_else(|| app_config.paths.history.clone());
    debug!(
        log = %log_path.display(),
        history = %history_path.display(),
        "paths resolved"
    );

    command(&Context {
        json,
        config: &app_config,
        log_path,
        history_path,
    })
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
