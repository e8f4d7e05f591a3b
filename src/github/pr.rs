//! Pull request operations.

use crate::catalog::RepositoryRef;
use crate::error::{BulkError, Result};
use crate::github::GitHubClient;
use serde::{Deserialize, Serialize};

/// A pull request on GitHub.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    pub title: String,
}

/// Request body for creating a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

impl CreatePullRequest {
    /// Create a new pull request.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        head: impl Into<String>,
        base: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            head: head.into(),
            base: base.into(),
        }
    }
}

/// Pull request operations.
pub trait PullRequestOps {
    /// Open a pull request on `repo`.
    fn create_pull_request(
        &self,
        repo: &RepositoryRef,
        pr: &CreatePullRequest,
    ) -> Result<PullRequest>;
}

impl PullRequestOps for GitHubClient {
    fn create_pull_request(
        &self,
        repo: &RepositoryRef,
        pr: &CreatePullRequest,
    ) -> Result<PullRequest> {
        let endpoint = format!("/repos/{}/pulls", repo.full_name);

        self.post(&endpoint, pr).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("422") {
                BulkError::PullRequestError {
                    message: format!(
                        "branch may not exist or a pull request already exists: {}",
                        msg
                    ),
                }
            } else {
                BulkError::PullRequestError { message: msg }
            }
        })
    }
}
