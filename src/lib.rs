//! # gh-bulk
//!
//! Make the same source-controlled change across many GitHub repositories.
//!
//! A run resolves which account's repositories to work on, lists them
//! through the search API, lets the user pick a working set, then for every
//! chosen repository, one at a time:
//!
//! 1. clones it into a run-scoped temporary directory,
//! 2. force-creates the change branch at HEAD,
//! 3. runs one shell command inside the checkout,
//! 4. stages everything, commits and pushes the branch to `origin`,
//! 5. opens a pull request against the default branch,
//! 6. removes the checkout, whatever happened before.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gh_bulk::prelude::*;
//!
//! let client = GitHubClient::new("ghp_token");
//! let search = GitHubSearch::new(client.clone(), CloneProtocol::Ssh);
//! let repos = Catalog::new(&search).list("acme", "topic:service")?;
//!
//! let change = ChangeDescriptor::new("chore/license", "Add license", "Adds MIT license")?;
//! let command = CommandDescriptor::new("cp ~/LICENSE .");
//! let (git, shell) = (Git::new(GitAuth::Agent), SystemShell::default());
//!
//! let report = Pipeline::new(&git, &client, &shell, &change, &command)
//!     .run(&Workspace::temporary()?, &repos);
//!
//! for outcome in report.failed() {
//!     eprintln!("{}: {:?}", outcome.repository.name, outcome.failure);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod change;
pub mod config;
pub mod error;
pub mod form;
pub mod git;
pub mod github;
pub mod identity;
pub mod pipeline;
pub mod selector;
pub mod session;
pub mod shell;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{Catalog, RepoSearch, RepositoryRef, SearchPage};
    pub use crate::change::{ChangeDescriptor, CommandDescriptor};
    pub use crate::config::{CloneProtocol, Settings};
    pub use crate::error::{BulkError, Result};
    pub use crate::form::{Form, TerminalForm};
    pub use crate::git::{CommitAuthor, Git, GitAuth, GitOps, VersionControl};
    pub use crate::github::{
        CreatePullRequest, GitHubClient, GitHubSearch, PullRequest, PullRequestOps,
    };
    pub use crate::identity::{AccountKind, AccountProfile, ProfileStore, resolve_owner};
    pub use crate::pipeline::{
        Event, Pipeline, RepoOutcome, RunReport, Stage, StageFailure, Workspace,
    };
    pub use crate::selector::{Selection, choose};
    pub use crate::session::{RunOutcome, Session};
    pub use crate::shell::{CommandOutput, Shell, SystemShell};
}

pub use prelude::*;
