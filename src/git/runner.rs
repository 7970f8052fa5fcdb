//! Runs the system `git` binary for the workflow steps.
//!
//! Commands shell out through `std::process::Command`, inheriting the user's
//! git config, SSH agent, and credential store. Stdout and stderr are passed
//! through so git's own diagnostics reach the terminal unchanged.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::GitError;

/// Exit status of one git invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitStatus {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
}

impl GitStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Trait for executing git commands.
///
/// This abstraction allows substituting the git subprocess in tests.
#[cfg_attr(test, mockall::automock)]
pub trait GitRunner {
    /// Run git with the given arguments and block until it exits.
    ///
    /// A non-zero exit is reported through [`GitStatus`], not as an error.
    /// Errors are reserved for failing to start git at all.
    fn run(&self, args: &[OsString]) -> Result<GitStatus, GitError>;
}

/// Runner that invokes the real git executable inside a working tree.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
    workdir: PathBuf,
}

impl SystemGit {
    /// Resolve `git_bin` on `PATH` and bind the runner to `workdir`.
    pub fn new(git_bin: &str, workdir: &Path) -> Result<Self, GitError> {
        let program = check_git_installed(git_bin)?;
        Ok(Self {
            program,
            workdir: workdir.to_path_buf(),
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[OsString]) -> Result<GitStatus, GitError> {
        debug!(
            "Running {} {:?} in {}",
            self.program.display(),
            args,
            self.workdir.display()
        );

        let status = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(GitError::SpawnFailed)?;

        debug!("git {:?} exited with {:?}", args, status.code());

        Ok(GitStatus {
            code: status.code(),
        })
    }
}

/// Check that the git executable is installed and return its resolved path.
///
/// Uses the `which` crate for cross-platform executable detection, so both
/// bare names and absolute paths are accepted.
pub fn check_git_installed(git_bin: &str) -> Result<PathBuf, GitError> {
    which::which(git_bin).map_err(|_| GitError::NotInstalled(git_bin.to_string()))
}
