//! Git commit operations.

use crate::error::Result;
use crate::git::GitOps;
use git2::{IndexAddOption, Signature, Time};

/// Commit time, in seconds since the Unix epoch, used unless overridden.
pub const FIXED_COMMIT_TIME: i64 = 0;

/// Identity and timestamp recorded as author and committer of pipeline commits.
///
/// The timestamp is fixed, so the same change applied to the same parent
/// yields the same commit id on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    /// Seconds since the Unix epoch, UTC.
    pub time: i64,
}

impl CommitAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            time: FIXED_COMMIT_TIME,
        }
    }

    /// Use `seconds` since the Unix epoch as the commit time.
    pub fn at(mut self, seconds: i64) -> Self {
        self.time = seconds;
        self
    }

    pub(crate) fn signature(&self) -> Result<Signature<'static>> {
        Ok(Signature::new(&self.name, &self.email, &Time::new(self.time, 0))?)
    }
}

impl Default for CommitAuthor {
    fn default() -> Self {
        Self::new("gh-bulk", "gh-bulk@users.noreply.github.com")
    }
}

/// Commit operations for GitOps.
pub trait CommitOps {
    /// Stage all changes (new, modified, deleted files).
    fn stage_all(&self) -> Result<()>;

    /// Create a commit of the index on HEAD, authored and committed by `author`.
    fn commit_as(&self, message: &str, author: &CommitAuthor) -> Result<git2::Oid>;

    /// Check if the index differs from HEAD.
    fn has_staged_changes(&self) -> Result<bool>;
}

impl CommitOps for GitOps {
    fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;

        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;

        // Drop entries whose files were deleted
        index.update_all(["*"].iter(), None)?;

        index.write()?;
        Ok(())
    }

    fn commit_as(&self, message: &str, author: &CommitAuthor) -> Result<git2::Oid> {
        let signature = author.signature()?;

        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(oid)
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let head = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let diff = self.repo.diff_tree_to_index(head.as_ref(), None, None)?;
        Ok(diff.deltas().count() > 0)
    }
}
