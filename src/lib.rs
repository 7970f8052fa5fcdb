//! quickpush - prompt for a commit message, stage everything, commit, and push.
//!
//! # Overview
//!
//! quickpush runs `git add -A`, `git commit -m <message>` and `git push` in
//! that order against one working tree, printing a status line before each
//! step. It stops at the first failing step by default and exits with git's
//! exit code.

pub mod config;
pub mod error;
pub mod git;
pub mod prompt;
pub mod workflow;

// Re-export commonly used types
pub use config::Settings;
pub use error::{GitError, PromptError, WorkflowError};
pub use git::{GitRunner, GitStatus, RepoContext, SystemGit, open_repository};
pub use prompt::{FixedMessage, MessageSource, ReaderSource, TerminalPrompt};
pub use workflow::{FailureMode, Step, WorkflowOptions, WorkflowReport, commit_and_push};
