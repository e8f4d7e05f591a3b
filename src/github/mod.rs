//! GitHub API integration.
//!
//! This module provides a blocking client for the GitHub REST API used to:
//! - Discover the authenticated login
//! - Search repositories under an owner, page by page
//! - Open pull requests
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_bulk::catalog::Catalog;
//! use gh_bulk::config::CloneProtocol;
//! use gh_bulk::github::{GitHubClient, GitHubSearch};
//!
//! let client = GitHubClient::new("ghp_your_token_here");
//! let search = GitHubSearch::new(client, CloneProtocol::Ssh);
//!
//! for repo in Catalog::new(&search).list("my-org", "")? {
//!     println!("{}: {}", repo.name, repo.remote_url);
//! }
//! # Ok::<(), gh_bulk::error::BulkError>(())
//! ```

mod client;
mod pr;
mod search;

pub use client::GitHubClient;
pub use pr::{CreatePullRequest, PullRequest, PullRequestOps};
pub use search::{GitHubRepo, GitHubSearch};
