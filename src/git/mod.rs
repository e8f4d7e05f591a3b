//! Version-control operations for the per-repository pipeline.
//!
//! [`GitOps`] wraps a `git2::Repository` rooted at one checkout and exposes the
//! write operations the pipeline needs through the [`BranchOps`], [`CommitOps`]
//! and [`PushOps`] traits. [`VersionControl`] is the capability interface the
//! pipeline actually calls; every method takes the checkout root explicitly so
//! no process-wide working directory is involved.
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_bulk::git::{BranchOps, CommitAuthor, CommitOps, GitAuth, GitOps, PushOps};
//!
//! let git = GitOps::clone("git@github.com:acme/widgets.git", "/tmp/widgets", GitAuth::Agent)?;
//!
//! git.force_checkout_new_branch("chore/bump")?;
//! // ... make changes ...
//! git.stage_all()?;
//! git.commit_as("chore: bump", &CommitAuthor::default())?;
//! git.push("origin", "chore/bump")?;
//! # Ok::<(), gh_bulk::error::BulkError>(())
//! ```

mod auth;
mod branch;
mod commit;
mod push;

pub use auth::GitAuth;
pub use branch::BranchOps;
pub use commit::{CommitAuthor, CommitOps, FIXED_COMMIT_TIME};
pub use push::PushOps;

use crate::error::{BulkError, Result};
use git2::Repository;
use git2::build::RepoBuilder;
use std::path::Path;

/// Git operations wrapper with write capabilities.
pub struct GitOps {
    repo: Repository,
    auth: GitAuth,
}

impl GitOps {
    /// Open an existing repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::open(path.as_ref())?;
        Ok(Self {
            repo,
            auth: GitAuth::default(),
        })
    }

    /// Clone `remote_url` into `dest`, which must not already contain a repository.
    pub fn clone(remote_url: &str, dest: impl AsRef<Path>, auth: GitAuth) -> Result<Self> {
        let dest = dest.as_ref();

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(auth.callbacks());

        let repo = RepoBuilder::new()
            .fetch_options(fetch_options)
            .clone(remote_url, dest)
            .map_err(|e| BulkError::CloneError {
                repo: remote_url.to_string(),
                message: e.message().to_string(),
            })?;

        Ok(Self { repo, auth })
    }

    /// Set authentication method for remote operations.
    pub fn with_auth(mut self, auth: GitAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Get a reference to the underlying git2::Repository.
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Get the repository's working directory path.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }
}

/// The version-control capabilities the batch pipeline depends on.
pub trait VersionControl {
    /// Acquire a fresh working copy of `remote_url` at `dest`.
    fn clone_repo(&self, remote_url: &str, dest: &Path) -> Result<()>;

    /// Create (or reset) branch `name` at HEAD and force-check it out.
    fn checkout_new_branch(&self, root: &Path, name: &str) -> Result<()>;

    /// Stage every working-tree change: new, modified and deleted files.
    fn stage_all(&self, root: &Path) -> Result<()>;

    /// Commit the index. Fails with [`BulkError::NothingToCommit`] on an empty diff.
    fn commit(&self, root: &Path, message: &str, author: &CommitAuthor) -> Result<git2::Oid>;

    /// Push `branch` to the remote named `remote`.
    fn push(&self, root: &Path, remote: &str, branch: &str) -> Result<()>;
}

/// [`VersionControl`] backed by libgit2.
#[derive(Debug, Clone, Default)]
pub struct Git {
    auth: GitAuth,
}

impl Git {
    pub fn new(auth: GitAuth) -> Self {
        Self { auth }
    }

    fn open(&self, root: &Path) -> Result<GitOps> {
        Ok(GitOps::open(root)?.with_auth(self.auth.clone()))
    }
}

impl VersionControl for Git {
    fn clone_repo(&self, remote_url: &str, dest: &Path) -> Result<()> {
        GitOps::clone(remote_url, dest, self.auth.clone()).map(|_| ())
    }

    fn checkout_new_branch(&self, root: &Path, name: &str) -> Result<()> {
        self.open(root)?.force_checkout_new_branch(name)
    }

    fn stage_all(&self, root: &Path) -> Result<()> {
        self.open(root)?.stage_all()
    }

    fn commit(&self, root: &Path, message: &str, author: &CommitAuthor) -> Result<git2::Oid> {
        let git = self.open(root)?;
        if !git.has_staged_changes()? {
            return Err(BulkError::NothingToCommit);
        }
        git.commit_as(message, author)
    }

    fn push(&self, root: &Path, remote: &str, branch: &str) -> Result<()> {
        self.open(root)?.push(remote, branch)
    }
}
