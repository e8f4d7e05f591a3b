//! Git branch operations.

use crate::error::{BulkError, Result};
use crate::git::GitOps;
use git2::build::CheckoutBuilder;

/// Branch operations for GitOps.
pub trait BranchOps {
    /// Create branch `name` at HEAD and force-checkout it.
    ///
    /// An existing local branch of the same name is reset to HEAD instead of
    /// producing an error, so repeated runs with one branch name are idempotent.
    fn force_checkout_new_branch(&self, name: &str) -> Result<()>;
}

impl BranchOps for GitOps {
    fn force_checkout_new_branch(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let refname = format!("refs/heads/{}", name);

        let mut checkout = CheckoutBuilder::new();
        checkout.force();

        // libgit2 refuses to force-move the branch HEAD is attached to. Its
        // tip already equals HEAD, so only the working tree needs resetting.
        let is_head = self
            .repo
            .find_branch(name, git2::BranchType::Local)
            .map(|b| b.is_head())
            .unwrap_or(false);

        if is_head {
            self.repo.checkout_head(Some(&mut checkout))?;
            return Ok(());
        }

        self.repo
            .branch(name, &head, true)
            .map_err(|e| BulkError::BranchError {
                message: format!("Failed to create branch '{}': {}", name, e.message()),
            })?;

        self.repo
            .checkout_tree(head.as_object(), Some(&mut checkout))?;
        self.repo.set_head(&refname)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CommitOps;
    use crate::git::CommitAuthor;
    use std::fs;
    use tempfile::TempDir;

    fn repo_with_commit(dir: &TempDir) -> GitOps {
        let opts = {
            let mut o = git2::RepositoryInitOptions::new();
            o.initial_head("main");
            o
        };
        git2::Repository::init_opts(dir.path(), &opts).unwrap();
        fs::write(dir.path().join("README.md"), "hello\n").unwrap();

        let git = GitOps::open(dir.path()).unwrap();
        git.stage_all().unwrap();
        git.commit_as("initial", &CommitAuthor::default()).unwrap();
        git
    }

    fn current_branch(git: &GitOps) -> String {
        let head = git.repo().head().unwrap();
        assert!(head.is_branch(), "HEAD is detached");
        head.shorthand().unwrap().to_string()
    }

    #[test]
    fn test_creates_and_checks_out_branch() {
        let dir = TempDir::new().unwrap();
        let git = repo_with_commit(&dir);

        git.force_checkout_new_branch("feat/ABC-123_v1.0").unwrap();

        assert!(git
            .repo()
            .find_branch("feat/ABC-123_v1.0", git2::BranchType::Local)
            .is_ok());
        assert_eq!(current_branch(&git), "feat/ABC-123_v1.0");
    }

    #[test]
    fn test_same_branch_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let git = repo_with_commit(&dir);

        git.force_checkout_new_branch("t1").unwrap();
        git.force_checkout_new_branch("t1").unwrap();

        let head = git.repo().head().unwrap().peel_to_commit().unwrap().id();
        let tip = git
            .repo()
            .find_branch("t1", git2::BranchType::Local)
            .unwrap()
            .get()
            .peel_to_commit()
            .unwrap()
            .id();
        assert_eq!(tip, head);
        assert_eq!(current_branch(&git), "t1");
    }

    #[test]
    fn test_existing_branch_is_reset_to_head() {
        let dir = TempDir::new().unwrap();
        let git = repo_with_commit(&dir);

        git.force_checkout_new_branch("t1").unwrap();
        git.force_checkout_new_branch("main").unwrap();

        fs::write(dir.path().join("next.txt"), "more\n").unwrap();
        git.stage_all().unwrap();
        let newer = git.commit_as("second", &CommitAuthor::default()).unwrap();

        git.force_checkout_new_branch("t1").unwrap();

        let tip = git
            .repo()
            .find_branch("t1", git2::BranchType::Local)
            .unwrap()
            .get()
            .peel_to_commit()
            .unwrap()
            .id();
        assert_eq!(tip, newer);
        assert!(dir.path().join("next.txt").exists());
    }

    #[test]
    fn test_force_checkout_discards_local_edits() {
        let dir = TempDir::new().unwrap();
        let git = repo_with_commit(&dir);

        fs::write(dir.path().join("README.md"), "dirty\n").unwrap();
        git.force_checkout_new_branch("clean").unwrap();

        let content = fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert_eq!(content, "hello\n");
    }
}
