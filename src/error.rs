//! Error types for quickpush modules using thiserror.
//!
//! Variants with a `#[source]` leave it out of their own message; the binary
//! prints the whole chain.

use thiserror::Error;

use crate::workflow::Step;

/// Errors from invoking or inspecting git.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable '{0}' not found on PATH. Install git or set QUICKPUSH_GIT")]
    NotInstalled(String),

    #[error("Failed to spawn git process")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Not a git repository")]
    OpenRepository(#[source] git2::Error),

    #[error("Bare repositories have no working tree to commit from")]
    BareRepository,
}

/// Errors from reading the commit message.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to read commit message")]
    ReadFailed(#[source] std::io::Error),

    #[error("Interactive prompt failed")]
    Interactive(#[source] dialoguer::Error),

    #[error("Commit message is empty. Use --allow-empty-message to commit anyway.")]
    EmptyMessage,
}

/// Errors from the stage/commit/push workflow.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Failed to write progress output")]
    Output(#[source] std::io::Error),

    #[error("git {} failed with {}", step.command(),
            code.map_or("no exit code (terminated by signal)".to_string(), |c| format!("exit code {c}")))]
    StepFailed { step: Step, code: Option<i32> },
}
