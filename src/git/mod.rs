//! Git access: the process runner for stage/commit/push and git2-based
//! repository inspection.

pub mod repo;
pub mod runner;

pub use repo::{RepoContext, Upstream, open_repository};
pub use runner::{GitRunner, GitStatus, SystemGit, check_git_installed};
