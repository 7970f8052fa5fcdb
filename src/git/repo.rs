//! Repository preflight using git2.
//!
//! Locates the working tree and reads the current branch and its upstream so
//! the workflow can run git in the right place and name the push target.
//! Nothing here refuses to proceed over branch state; a missing upstream is
//! left for `git push` itself to report.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{debug, warn};

use crate::error::GitError;

/// The remote branch the current branch tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub remote: String,
    pub branch: String,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// What the workflow needs to know about the target repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    /// Root of the working tree; git commands run here.
    pub root: PathBuf,
    /// Current branch, or `None` on a detached HEAD.
    pub branch: Option<String>,
    /// Configured upstream of the current branch.
    pub upstream: Option<Upstream>,
}

impl RepoContext {
    /// Context for a working tree whose branch state is unknown.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            branch: None,
            upstream: None,
        }
    }
}

/// Open the repository containing `path` and collect its branch state.
pub fn open_repository(path: &Path) -> Result<RepoContext, GitError> {
    let repo = Repository::discover(path).map_err(GitError::OpenRepository)?;

    let root = repo
        .workdir()
        .ok_or(GitError::BareRepository)?
        .to_path_buf();

    let branch = current_branch(&repo);
    let upstream = match branch.as_deref() {
        Some(name) => tracking_branch(&repo, name),
        None => {
            warn!("HEAD is detached; git push may have no upstream to push to");
            None
        }
    };

    if let (Some(name), None) = (branch.as_deref(), upstream.as_ref()) {
        warn!(
            "Branch '{}' has no upstream configured; git push will likely fail. Set one with: git push -u <remote> {}",
            name, name
        );
    }

    debug!(
        "Repository root {}, branch {:?}, upstream {:?}",
        root.display(),
        branch,
        upstream
    );

    Ok(RepoContext {
        root,
        branch,
        upstream,
    })
}

/// Name of the branch HEAD points to, including an unborn branch.
fn current_branch(repo: &Repository) -> Option<String> {
    match repo.head() {
        Ok(head) if head.is_branch() => head.shorthand().map(String::from),
        Ok(_) => None,
        Err(_) => {
            // Unborn branch: HEAD is symbolic but its target has no commits yet.
            let head = repo.find_reference("HEAD").ok()?;
            head.symbolic_target()
                .and_then(|target| target.strip_prefix("refs/heads/"))
                .map(String::from)
        }
    }
}

/// Resolve tracked upstream for a branch from git config.
fn tracking_branch(repo: &Repository, branch: &str) -> Option<Upstream> {
    let config = repo.config().ok()?;

    let remote = config.get_string(&format!("branch.{}.remote", branch)).ok()?;
    let merge_ref = config.get_string(&format!("branch.{}.merge", branch)).ok()?;

    let upstream_branch = merge_ref
        .strip_prefix("refs/heads/")
        .unwrap_or(&merge_ref)
        .to_string();

    if remote.trim().is_empty() || upstream_branch.trim().is_empty() {
        return None;
    }

    Some(Upstream {
        remote,
        branch: upstream_branch,
    })
}
