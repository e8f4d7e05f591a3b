//! One interactive run: search, select, describe the change, confirm, then
//! drive the pipeline.
//!
//! Every prompt and message goes through the [`Form`], and every side effect
//! through the collaborators handed to [`Session::new`], so a run can be
//! replayed against fakes.

use crate::catalog::{Catalog, RepoSearch, RepositoryRef};
use crate::change::{ChangeDescriptor, CommandDescriptor};
use crate::error::{BulkError, Result};
use crate::form::Form;
use crate::git::{CommitAuthor, VersionControl};
use crate::github::PullRequestOps;
use crate::pipeline::{Event, Pipeline, RunReport, Workspace};
use crate::selector::{Selection, choose};
use crate::shell::Shell;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The user declined the confirmation or closed the input.
    Aborted,
    /// The search matched no repositories.
    NoRepositories,
    /// The user chose none of the listed repositories.
    NothingSelected,
    /// The pipeline ran over the chosen repositories.
    Completed(RunReport),
}

impl RunOutcome {
    /// False only when the pipeline ran and some repository failed.
    pub fn is_success(&self) -> bool {
        match self {
            RunOutcome::Completed(report) => report.is_success(),
            _ => true,
        }
    }
}

type Progress<'a> = Box<dyn FnMut(&Event<'_>) + 'a>;

/// Interactive front end for a [`Pipeline`].
pub struct Session<'a> {
    search: &'a dyn RepoSearch,
    vcs: &'a dyn VersionControl,
    host: &'a dyn PullRequestOps,
    shell: &'a dyn Shell,
    author: CommitAuthor,
    progress: Option<Progress<'a>>,
}

impl<'a> Session<'a> {
    pub fn new(
        search: &'a dyn RepoSearch,
        vcs: &'a dyn VersionControl,
        host: &'a dyn PullRequestOps,
        shell: &'a dyn Shell,
    ) -> Self {
        Self {
            search,
            vcs,
            host,
            shell,
            author: CommitAuthor::default(),
            progress: None,
        }
    }

    /// Set the author and committer of pipeline commits.
    pub fn author(mut self, author: CommitAuthor) -> Self {
        self.author = author;
        self
    }

    /// Receive pipeline [`Event`]s once the run is confirmed.
    pub fn on_progress(mut self, f: impl FnMut(&Event<'_>) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Run against the repositories of `owner`, cloning into `workspace`.
    ///
    /// Closing the input at any prompt, or declining the confirmation, prints
    /// "Aborting..." and returns [`RunOutcome::Aborted`] before any repository
    /// is touched. A catalog failure is returned as an error, also before any
    /// repository is touched.
    pub fn run(
        &mut self,
        form: &mut dyn Form,
        owner: &str,
        workspace: &Workspace,
    ) -> Result<RunOutcome> {
        match self.interact(form, owner, workspace) {
            Err(BulkError::Aborted) => {
                form.notice("Aborting...")?;
                Ok(RunOutcome::Aborted)
            }
            other => other,
        }
    }

    fn interact(
        &mut self,
        form: &mut dyn Form,
        owner: &str,
        workspace: &Workspace,
    ) -> Result<RunOutcome> {
        let query = form.input("Search", "Empty query will return all repositories")?;

        form.notice("Fetching repositories...")?;
        let catalog = Catalog::new(self.search).list(owner, &query)?;

        let repos = match choose(&catalog, form)? {
            Selection::EmptyCatalog => {
                form.notice("No repositories found")?;
                return Ok(RunOutcome::NoRepositories);
            }
            Selection::NothingSelected => {
                form.notice("No repositories selected")?;
                return Ok(RunOutcome::NothingSelected);
            }
            Selection::Selected(repos) => repos,
        };

        let change = ChangeDescriptor::collect(form)?;
        let command = CommandDescriptor::collect(form)?;

        if !form.confirm("Verify Info", &describe(&command, &change, &repos))? {
            return Err(BulkError::Aborted);
        }
        tracing::info!(repositories = repos.len(), branch = change.branch_name(), "run confirmed");

        let progress = &mut self.progress;
        let report = Pipeline::new(self.vcs, self.host, self.shell, &change, &command)
            .author(self.author.clone())
            .on_progress(|event| {
                if let Some(progress) = progress.as_mut() {
                    progress(event);
                }
            })
            .run(workspace, &repos);

        Ok(RunOutcome::Completed(report))
    }
}

fn describe(
    command: &CommandDescriptor,
    change: &ChangeDescriptor,
    repos: &[RepositoryRef],
) -> String {
    let mut description = format!(
        "{:<20} {}\n{:<20} {}\n{:<20} {}\n{:<20} {}\n\nRepositories:\n",
        "command:",
        command.command_line(),
        "branch name:",
        change.branch_name(),
        "pull request title:",
        change.pr_title(),
        "commit message:",
        change.message(),
    );
    for repo in repos {
        description.push_str(&format!("  {}\n", repo.name));
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_lists_fields_and_repositories() {
        let change = ChangeDescriptor::new("t1", "Add f.txt", "m").unwrap();
        let command = CommandDescriptor::new("echo hi > f.txt");
        let repos = vec![
            RepositoryRef::new("a", "acme/a", "url", "main"),
            RepositoryRef::new("b", "acme/b", "url", "main"),
        ];

        let text = describe(&command, &change, &repos);
        assert!(text.starts_with("command:             echo hi > f.txt\n"));
        assert!(text.contains("pull request title:  Add f.txt\n"));
        assert!(text.ends_with("Repositories:\n  a\n  b\n"));
    }

    #[test]
    fn test_only_a_failed_report_is_unsuccessful() {
        assert!(RunOutcome::Aborted.is_success());
        assert!(RunOutcome::NoRepositories.is_success());
        assert!(RunOutcome::NothingSelected.is_success());
        assert!(RunOutcome::Completed(RunReport::default()).is_success());
    }
}
