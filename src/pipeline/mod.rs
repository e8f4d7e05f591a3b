//! Batch pipeline: apply one change to many repositories, one at a time.
//!
//! Each repository goes through
//! `clone → branch → run command → commit and push → open pull request`,
//! stopping at the first failing step, and then always through clean-up.
//! A failure in one repository never affects the next one; every pass ends
//! up as a [`RepoOutcome`] in the [`RunReport`].
//!
//! Collaborators receive the checkout root explicitly, so the process's
//! working directory is never changed.
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_bulk::change::{ChangeDescriptor, CommandDescriptor};
//! use gh_bulk::git::{Git, GitAuth};
//! use gh_bulk::github::GitHubClient;
//! use gh_bulk::pipeline::{Pipeline, Workspace};
//! use gh_bulk::shell::SystemShell;
//!
//! let change = ChangeDescriptor::new("chore/bump", "Bump deps", "")?;
//! let command = CommandDescriptor::new("./scripts/bump.sh");
//! let (git, shell) = (Git::new(GitAuth::Agent), SystemShell::default());
//! let host = GitHubClient::new("ghp_token");
//! # let repos = vec![];
//!
//! let report = Pipeline::new(&git, &host, &shell, &change, &command)
//!     .run(&Workspace::temporary()?, &repos);
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod stage;
mod workspace;

pub use stage::{RepositoryWorkState, Stage, StageFailure};
pub use workspace::{Checkout, Workspace};

use crate::catalog::RepositoryRef;
use crate::change::{ChangeDescriptor, CommandDescriptor};
use crate::error::BulkError;
use crate::git::{CommitAuthor, VersionControl};
use crate::github::{CreatePullRequest, PullRequest, PullRequestOps};
use crate::shell::Shell;
use std::fmt;
use std::path::Path;

/// Remote the new branch is pushed to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum Event<'e> {
    Started(&'e RepositoryRef),
    Reached(&'e RepositoryRef, Stage),
    Failed(&'e RepositoryRef, &'e StageFailure),
    CleanupFailed(&'e RepositoryRef, &'e str),
}

/// What happened to one repository.
#[derive(Debug)]
pub struct RepoOutcome {
    pub repository: RepositoryRef,
    /// Furthest stage reached before clean-up.
    pub reached: Stage,
    pub failure: Option<StageFailure>,
    pub pull_request: Option<PullRequest>,
    /// Set when removing the checkout failed. Does not count as a failure.
    pub cleanup_error: Option<String>,
}

impl RepoOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Outcomes of every repository in a run, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<RepoOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &RepoOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RepoOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// True when every repository reached an opened pull request.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(RepoOutcome::is_success)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match (&outcome.failure, &outcome.pull_request) {
                (Some(failure), _) => {
                    writeln!(f, "  ✗ {}: {}", outcome.repository.name, failure)?
                }
                (None, Some(pr)) => {
                    writeln!(f, "  ✓ {}: {}", outcome.repository.name, pr.html_url)?
                }
                (None, None) => writeln!(f, "  ✓ {}", outcome.repository.name)?,
            }
        }
        write!(
            f,
            "{} succeeded, {} failed",
            self.succeeded().count(),
            self.failed().count()
        )
    }
}

type Progress<'a> = Box<dyn FnMut(&Event<'_>) + 'a>;

/// Drives every selected repository through the stages in order.
pub struct Pipeline<'a> {
    vcs: &'a dyn VersionControl,
    host: &'a dyn PullRequestOps,
    shell: &'a dyn Shell,
    change: &'a ChangeDescriptor,
    command: &'a CommandDescriptor,
    author: CommitAuthor,
    remote: String,
    progress: Option<Progress<'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        host: &'a dyn PullRequestOps,
        shell: &'a dyn Shell,
        change: &'a ChangeDescriptor,
        command: &'a CommandDescriptor,
    ) -> Self {
        Self {
            vcs,
            host,
            shell,
            change,
            command,
            author: CommitAuthor::default(),
            remote: DEFAULT_REMOTE.to_string(),
            progress: None,
        }
    }

    /// Set the author and committer of pipeline commits.
    pub fn author(mut self, author: CommitAuthor) -> Self {
        self.author = author;
        self
    }

    /// Set the remote the branch is pushed to.
    pub fn remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Receive an [`Event`] as each repository progresses.
    pub fn on_progress(mut self, f: impl FnMut(&Event<'_>) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Process `repos` strictly in order, each to completion before the next.
    pub fn run(&mut self, workspace: &Workspace, repos: &[RepositoryRef]) -> RunReport {
        let outcomes = repos
            .iter()
            .map(|repo| self.process(workspace, repo))
            .collect();
        RunReport { outcomes }
    }

    fn emit(&mut self, event: Event<'_>) {
        if let Some(progress) = self.progress.as_mut() {
            progress(&event);
        }
    }

    fn process(&mut self, workspace: &Workspace, repo: &RepositoryRef) -> RepoOutcome {
        let _span = tracing::info_span!("repo", name = %repo.name).entered();
        self.emit(Event::Started(repo));

        let mut state = RepositoryWorkState::new(repo.clone());
        let checkout = workspace.checkout(&repo.name);

        let pull_request = match self.advance(&mut state, &checkout) {
            Ok(pr) => Some(pr),
            Err(failure) => {
                tracing::warn!(stage = %failure.stage, error = %failure.error, "repository failed");
                self.emit(Event::Failed(repo, &failure));
                state.fail(failure);
                None
            }
        };
        let reached = state.stage();

        let released = checkout.path().to_path_buf();
        let cleanup_error = match checkout.release() {
            Ok(()) => None,
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(error = %message, "cleanup failed");
                self.emit(Event::CleanupFailed(repo, &message));
                Some(message)
            }
        };
        state.cleaned(&released);
        tracing::debug!(path = ?state.local_path(), "checkout released");
        self.emit(Event::Reached(repo, Stage::Cleaned));

        RepoOutcome {
            repository: repo.clone(),
            reached,
            failure: state.take_error(),
            pull_request,
            cleanup_error,
        }
    }

    fn advance(
        &mut self,
        state: &mut RepositoryWorkState,
        checkout: &Checkout,
    ) -> Result<PullRequest, StageFailure> {
        let repo = state.repository.clone();
        let root = checkout.path();

        self.step(state, |p| {
            checkout.prepare()?;
            p.vcs.clone_repo(&repo.remote_url, root)
        })?;
        state.cloned(root);
        self.emit(Event::Reached(&repo, Stage::Cloned));

        self.step(state, |p| p.vcs.checkout_new_branch(root, p.change.branch_name()))?;
        self.reach(state, &repo, Stage::Branched);

        self.step(state, |p| p.run_command(root))?;
        self.reach(state, &repo, Stage::CommandRun);

        self.step(state, |p| {
            p.vcs.stage_all(root)?;
            let oid = p.vcs.commit(root, p.change.message(), &p.author)?;
            tracing::debug!(%oid, "committed");
            p.vcs.push(root, &p.remote, p.change.branch_name())
        })?;
        self.reach(state, &repo, Stage::Pushed);

        let request = CreatePullRequest::new(
            self.change.pr_title(),
            self.change.message(),
            self.change.branch_name(),
            &repo.default_branch,
        );
        let pr = self
            .host
            .create_pull_request(&repo, &request)
            .map_err(|e| StageFailure::new(state.pending(), e))?;
        self.reach(state, &repo, Stage::PROpened);

        Ok(pr)
    }

    /// Run one step, attributing any error to the stage it was meant to reach.
    fn step<T>(
        &mut self,
        state: &RepositoryWorkState,
        f: impl FnOnce(&mut Self) -> crate::error::Result<T>,
    ) -> Result<T, StageFailure> {
        let pending = state.pending();
        tracing::debug!(step = %pending, "starting");
        f(self).map_err(|e| StageFailure::new(pending, e))
    }

    fn reach(&mut self, state: &mut RepositoryWorkState, repo: &RepositoryRef, stage: Stage) {
        state.advance(stage);
        self.emit(Event::Reached(repo, stage));
    }

    fn run_command(&self, root: &Path) -> crate::error::Result<()> {
        let out = self.shell.run(self.command.command_line(), root)?;
        if out.success() {
            Ok(())
        } else {
            Err(BulkError::CommandFailed {
                code: out.code.unwrap_or(-1),
                output: out.output,
            })
        }
    }
}
