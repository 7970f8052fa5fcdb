//! quickpush - CLI entry point.

use std::ffi::OsString;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::console::Term;
use tracing_subscriber::EnvFilter;

use quickpush::workflow::commit_and_push;
use quickpush::{
    FailureMode, FixedMessage, MessageSource, ReaderSource, Settings, SystemGit, TerminalPrompt,
    WorkflowError, WorkflowOptions, open_repository,
};

/// Stage all changes, commit them, and push to upstream.
#[derive(Parser, Debug)]
#[command(name = "quickpush")]
#[command(about = "Stage all changes, commit them, and push to upstream")]
#[command(version)]
struct Cli {
    /// Path inside the repository to operate on
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: PathBuf,

    /// Commit message (skips the interactive prompt)
    #[arg(short, long)]
    message: Option<OsString>,

    /// Commit even when the message is empty
    #[arg(long)]
    allow_empty_message: bool,

    /// Run every step even if an earlier one fails
    #[arg(long)]
    keep_going: bool,

    /// Exit without waiting for a key press
    #[arg(long)]
    no_pause: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::from_env();
    let pause = !cli.no_pause && !settings.no_pause && io::stdout().is_terminal();

    let code = match run(&cli, &settings) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<WorkflowError>()
                .map_or(1, WorkflowError::exit_code)
        }
    };

    if pause {
        wait_for_key();
    }

    ExitCode::from(code)
}

fn run(cli: &Cli, settings: &Settings) -> Result<u8> {
    let ctx = open_repository(&cli.repo)
        .with_context(|| format!("Failed to open repository at {}", cli.repo.display()))?;

    let git = SystemGit::new(&settings.git_bin, &ctx.root).context("git is required")?;

    let options = WorkflowOptions {
        failure_mode: if cli.keep_going {
            FailureMode::KeepGoing
        } else {
            FailureMode::StopOnFailure
        },
        allow_empty_message: cli.allow_empty_message,
    };

    let mut source: Box<dyn MessageSource> = match &cli.message {
        Some(message) => Box::new(FixedMessage(message.clone())),
        None if io::stdin().is_terminal() => Box::new(TerminalPrompt),
        None => Box::new(ReaderSource::new(
            BufReader::new(io::stdin()),
            io::stdout(),
        )),
    };

    let mut out = io::stdout();
    let mut err = io::stderr();
    let report = commit_and_push(&git, &ctx, source.as_mut(), &options, &mut out, &mut err)?;

    Ok(report.exit_code())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Hold the terminal open until the user presses a key.
fn wait_for_key() {
    let term = Term::stdout();
    if term.write_line("Press any key to exit...").is_err() {
        return;
    }
    // A failed read (e.g. terminal closed) just means we exit now.
    let _ = term.read_key();
}
