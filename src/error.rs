//! Error types for gh-bulk.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for bulk repository operations.
#[derive(Error, Debug)]
pub enum BulkError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {message}")]
    GitHub { message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Input aborted")]
    Aborted,

    #[error("Catalog listing failed: {message}")]
    Catalog { message: String },

    #[error("Profile store error at {path}: {message}")]
    ProfileStore { path: PathBuf, message: String },

    #[error("Clone failed for {repo}: {message}")]
    CloneError { repo: String, message: String },

    #[error("Branch operation failed: {message}")]
    BranchError { message: String },

    #[error("Command exited with status {code}:\n{output}")]
    CommandFailed { code: i32, output: String },

    #[error("Nothing to commit: the command produced no changes")]
    NothingToCommit,

    #[error("Push failed: {message}")]
    PushError { message: String },

    #[error("Pull request creation failed: {message}")]
    PullRequestError { message: String },
}

/// A specialized Result type for bulk operations.
pub type Result<T> = std::result::Result<T, BulkError>;
