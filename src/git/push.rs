//! Git push operations with authentication.

use crate::error::{BulkError, Result};
use crate::git::GitOps;
use git2::PushOptions;
use std::cell::RefCell;

/// Push operations for GitOps.
pub trait PushOps {
    /// Push a local branch to the same-named branch on a remote.
    ///
    /// A per-reference rejection from the remote (for example a diverged
    /// branch) is reported as [`BulkError::PushError`].
    fn push(&self, remote_name: &str, branch: &str) -> Result<()>;
}

impl PushOps for GitOps {
    fn push(&self, remote_name: &str, branch: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            BulkError::PushError {
                message: format!("Remote '{}' not found", remote_name),
            }
        })?;

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        let rejected: RefCell<Option<String>> = RefCell::new(None);

        {
            let mut callbacks = self.auth.callbacks();
            callbacks.push_update_reference(|refname, status| {
                if let Some(reason) = status {
                    *rejected.borrow_mut() = Some(format!("{} rejected: {}", refname, reason));
                }
                Ok(())
            });

            let mut push_options = PushOptions::new();
            push_options.remote_callbacks(callbacks);

            remote
                .push(&[&refspec], Some(&mut push_options))
                .map_err(|e| BulkError::PushError {
                    message: e.message().to_string(),
                })?;
        }

        match rejected.into_inner() {
            Some(message) => Err(BulkError::PushError { message }),
            None => Ok(()),
        }
    }
}
