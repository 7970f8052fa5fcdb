//! Commit-and-push workflow.
//!
//! Stages every change in the working tree, commits it with the given
//! message, and pushes the current branch to its upstream. Steps run strictly
//! in that order, one blocking git invocation each, with a status line printed
//! before every step.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Write;

use tracing::{debug, warn};

use crate::error::WorkflowError;
use crate::git::{GitRunner, GitStatus, RepoContext};
use crate::prompt::{MessageSource, is_blank, validate_message};

/// Line printed once the sequence has finished.
pub const COMPLETION_LINE: &str = "Done.";

/// One git operation in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stage,
    Commit,
    Push,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Step; 3] = [Step::Stage, Step::Commit, Step::Push];

    /// The git subcommand this step runs.
    pub fn command(&self) -> &'static str {
        match self {
            Step::Stage => "add",
            Step::Commit => "commit",
            Step::Push => "push",
        }
    }

    /// Progress line shown before the step runs.
    pub fn status_line(&self, ctx: &RepoContext) -> String {
        match self {
            Step::Stage => "Staging all changes...".to_string(),
            Step::Commit => "Committing changes...".to_string(),
            Step::Push => match &ctx.upstream {
                Some(upstream) => format!("Pushing to {}...", upstream),
                None => "Pushing to upstream...".to_string(),
            },
        }
    }

    /// Full git argument list for this step.
    ///
    /// `git add -A` covers new, modified and deleted files across the whole
    /// working tree. `git push` with no refspec targets the configured upstream.
    /// The message is passed through byte for byte, whatever its encoding.
    pub fn git_args(&self, message: &OsStr, allow_empty_message: bool) -> Vec<OsString> {
        match self {
            Step::Stage => vec!["add".into(), "-A".into()],
            Step::Commit => {
                let mut args: Vec<OsString> = vec!["commit".into()];
                if allow_empty_message && is_blank(message) {
                    args.push("--allow-empty-message".into());
                }
                args.push("-m".into());
                args.push(message.to_os_string());
                args
            }
            Step::Push => vec!["push".into()],
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Stage => "stage",
            Step::Commit => "commit",
            Step::Push => "push",
        };
        f.write_str(name)
    }
}

/// What to do when a step's git command exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Stop at the first failed step and report it.
    #[default]
    StopOnFailure,
    /// Run every step and print every status line regardless of failures.
    KeepGoing,
}

/// Options for one run of the workflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowOptions {
    pub failure_mode: FailureMode,
    pub allow_empty_message: bool,
}

/// How a single step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub status: GitStatus,
}

/// Result of a workflow run in which every attempted step was launched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowReport {
    pub outcomes: Vec<StepOutcome>,
}

impl WorkflowReport {
    pub fn first_failure(&self) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| !o.status.success())
    }

    pub fn succeeded(&self) -> bool {
        self.first_failure().is_none()
    }

    /// Process exit code: 0, or the first failed step's code.
    pub fn exit_code(&self) -> u8 {
        self.first_failure()
            .map_or(0, |outcome| exit_code_for(outcome.status.code))
    }
}

impl WorkflowError {
    /// Process exit code for an aborted run.
    pub fn exit_code(&self) -> u8 {
        match self {
            WorkflowError::StepFailed { code, .. } => exit_code_for(*code),
            _ => 1,
        }
    }
}

/// Map a git exit code onto a non-zero process exit code.
///
/// Codes outside 1..=255, and signal terminations, become 1.
pub fn exit_code_for(code: Option<i32>) -> u8 {
    match code.and_then(|c| u8::try_from(c).ok()) {
        Some(c) if c != 0 => c,
        _ => 1,
    }
}

/// Read a message from `source`, then stage, commit and push.
///
/// The message is validated before any git command runs, so a rejected
/// message leaves the index untouched.
pub fn commit_and_push<G, S, W, E>(
    runner: &G,
    ctx: &RepoContext,
    source: &mut S,
    options: &WorkflowOptions,
    out: &mut W,
    err: &mut E,
) -> Result<WorkflowReport, WorkflowError>
where
    G: GitRunner + ?Sized,
    S: MessageSource + ?Sized,
    W: Write,
    E: Write,
{
    let message = source.read_message()?;
    let message = validate_message(message, options.allow_empty_message)?;
    run_steps(runner, ctx, &message, options, out, err)
}

/// Run stage, commit and push in order with the given message.
///
/// In [`FailureMode::StopOnFailure`] the first non-zero git exit aborts with
/// [`WorkflowError::StepFailed`]. In [`FailureMode::KeepGoing`] all steps run
/// and failures are only recorded in the returned report.
///
/// Status lines go to `out`; `[FAIL]` and `[WARN]` lines go to `err`.
pub fn run_steps<G, W, E>(
    runner: &G,
    ctx: &RepoContext,
    message: &OsStr,
    options: &WorkflowOptions,
    out: &mut W,
    err: &mut E,
) -> Result<WorkflowReport, WorkflowError>
where
    G: GitRunner + ?Sized,
    W: Write,
    E: Write,
{
    let mut report = WorkflowReport::default();

    for step in Step::ALL {
        writeln!(out, "{}", step.status_line(ctx)).map_err(WorkflowError::Output)?;
        out.flush().map_err(WorkflowError::Output)?;

        let args = step.git_args(message, options.allow_empty_message);
        let status = runner.run(&args)?;
        report.outcomes.push(StepOutcome { step, status });

        if status.success() {
            debug!("Step {} succeeded", step);
            continue;
        }

        writeln!(
            err,
            "  [FAIL] git {} exited with {}",
            step.command(),
            describe(status)
        )
        .map_err(WorkflowError::Output)?;

        match options.failure_mode {
            FailureMode::StopOnFailure => {
                return Err(WorkflowError::StepFailed {
                    step,
                    code: status.code,
                });
            }
            FailureMode::KeepGoing => {
                warn!("Step {} failed; continuing because --keep-going is set", step);
            }
        }
    }

    writeln!(out, "{}", COMPLETION_LINE).map_err(WorkflowError::Output)?;

    if let Some(failed) = report.first_failure() {
        writeln!(
            err,
            "  [WARN] Finished with errors: git {} failed first",
            failed.step.command()
        )
        .map_err(WorkflowError::Output)?;
    }

    Ok(report)
}

fn describe(status: GitStatus) -> String {
    status
        .code
        .map_or("no exit code".to_string(), |c| format!("code {c}"))
}
