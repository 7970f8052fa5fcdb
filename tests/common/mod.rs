//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use git2::{Repository, Signature};

/// A working repository with a bare local remote as its upstream.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub remote_dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a repository with one pushed commit and upstream tracking set.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");

        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
            config
                .set_bool("commit.gpgsign", false)
                .expect("Failed to disable commit signing");
        }

        let remote_dir = tempfile::tempdir().expect("Failed to create remote dir");
        Repository::init_bare(remote_dir.path()).expect("Failed to init bare repo");
        repo.remote(
            "origin",
            remote_dir.path().to_str().expect("Invalid remote path"),
        )
        .expect("Failed to add origin remote");

        let test_repo = Self {
            dir,
            remote_dir,
            repo,
        };

        test_repo.write_file("README.md", "initial\n");
        test_repo.commit_all("initial commit");

        let output = test_repo.git(&["push", "-u", "origin", "HEAD"]);
        assert!(
            output.status.success(),
            "git push failed in test setup: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the repository root.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Stage everything with git2 and commit on HEAD.
    pub fn commit_all(&self, message: &str) {
        let sig = Signature::now("Test User", "test@example.com")
            .expect("Failed to create signature");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit");
    }

    /// Run git in the repository root.
    pub fn git(&self, args: &[&str]) -> Output {
        Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run git")
    }

    pub fn branch(&self) -> String {
        self.repo
            .head()
            .ok()
            .and_then(|h| h.shorthand().map(|s| s.to_string()))
            .expect("HEAD should be on a branch")
    }

    /// Number of commits reachable from local HEAD.
    pub fn commit_count(&self) -> usize {
        let mut revwalk = self.repo.revwalk().expect("Failed to create revwalk");
        revwalk.push_head().expect("Failed to push HEAD");
        revwalk.count()
    }

    /// Message of the local HEAD commit.
    pub fn head_message(&self) -> String {
        let commit = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to resolve HEAD commit");
        commit.message().unwrap_or("").to_string()
    }

    /// Raw bytes of the local HEAD commit message.
    pub fn head_message_bytes(&self) -> Vec<u8> {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map(|c| c.message_bytes().to_vec())
            .expect("Failed to resolve HEAD commit")
    }

    pub fn head_oid(&self) -> git2::Oid {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map(|c| c.id())
            .expect("Failed to resolve HEAD commit")
    }

    /// Commit id at the tip of the tracked branch on the bare remote.
    pub fn remote_head_oid(&self) -> git2::Oid {
        let remote = Repository::open_bare(self.remote_dir.path()).expect("Failed to open remote");
        let reference = format!("refs/heads/{}", self.branch());
        remote
            .refname_to_id(&reference)
            .expect("Remote branch should exist")
    }

    /// Point origin at a path that does not exist so pushes fail.
    pub fn break_remote(&self) {
        let missing = self.remote_dir.path().join("does-not-exist.git");
        self.repo
            .remote_set_url("origin", missing.to_str().expect("Invalid path"))
            .expect("Failed to set remote url");
    }
}
