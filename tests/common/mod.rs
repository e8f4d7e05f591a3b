//! Recording fakes shared by the integration tests.

#![allow(dead_code)]

use gh_bulk::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const FULL_PASS: [&str; 7] = ["clone", "branch", "run", "stage", "commit", "push", "pr"];

/// One object standing in for search, git, the shell and the hosting platform.
///
/// Every per-repository call is logged as `"<op>:<repo>"`; `fail` makes the
/// step that would reach the given stage fail for the named repository.
#[derive(Default)]
pub struct World {
    pub log: RefCell<Vec<String>>,
    pub fail: HashMap<String, Stage>,
    pub catalog: Vec<RepositoryRef>,
    pub search_fails: bool,
    pub searches: RefCell<Vec<(String, String, u32)>>,
    pub commits: RefCell<Vec<(String, CommitAuthor)>>,
    pub pushes: RefCell<Vec<(String, String)>>,
    pub pull_requests: RefCell<Vec<(String, CreatePullRequest)>>,
}

impl World {
    pub fn failing(repo: &str, stage: Stage) -> Self {
        Self {
            fail: HashMap::from([(repo.to_string(), stage)]),
            ..Default::default()
        }
    }

    /// A world whose search finds exactly `names`.
    pub fn with_catalog(names: &[&str]) -> Self {
        Self {
            catalog: repos(names),
            ..Default::default()
        }
    }

    fn record(&self, op: &str, name: &str) {
        self.log.borrow_mut().push(format!("{}:{}", op, name));
    }

    fn check(&self, stage: Stage, name: &str) -> gh_bulk::Result<()> {
        if self.fail.get(name) == Some(&stage) {
            Err(BulkError::Invalid(format!("injected {} failure", stage)))
        } else {
            Ok(())
        }
    }

    pub fn ops_for(&self, name: &str) -> Vec<String> {
        let suffix = format!(":{}", name);
        self.log
            .borrow()
            .iter()
            .filter_map(|e| e.strip_suffix(&suffix).map(String::from))
            .collect()
    }
}

fn name_of(root: &Path) -> String {
    root.file_name().unwrap().to_string_lossy().into_owned()
}

impl RepoSearch for World {
    fn search(&self, owner: &str, query: &str, page: u32) -> gh_bulk::Result<SearchPage> {
        self.searches
            .borrow_mut()
            .push((owner.to_string(), query.to_string(), page));
        if self.search_fails {
            return Err(BulkError::GitHub {
                message: "API request failed (502 Bad Gateway)".into(),
            });
        }
        let items = if page == 1 {
            self.catalog.clone()
        } else {
            Vec::new()
        };
        Ok(SearchPage {
            items,
            total_count: self.catalog.len(),
        })
    }
}

impl VersionControl for World {
    fn clone_repo(&self, remote_url: &str, dest: &Path) -> gh_bulk::Result<()> {
        let name = name_of(dest);
        self.record("clone", &name);
        // Leave a partial checkout behind even when failing.
        fs::create_dir_all(dest.join(".git"))?;
        fs::write(dest.join("REMOTE"), remote_url)?;
        self.check(Stage::Cloned, &name)
    }

    fn checkout_new_branch(&self, root: &Path, _name: &str) -> gh_bulk::Result<()> {
        let name = name_of(root);
        self.record("branch", &name);
        self.check(Stage::Branched, &name)
    }

    fn stage_all(&self, root: &Path) -> gh_bulk::Result<()> {
        self.record("stage", &name_of(root));
        Ok(())
    }

    fn commit(
        &self,
        root: &Path,
        message: &str,
        author: &CommitAuthor,
    ) -> gh_bulk::Result<git2::Oid> {
        self.record("commit", &name_of(root));
        self.commits
            .borrow_mut()
            .push((message.to_string(), author.clone()));
        Ok(git2::Oid::zero())
    }

    fn push(&self, root: &Path, remote: &str, branch: &str) -> gh_bulk::Result<()> {
        let name = name_of(root);
        self.record("push", &name);
        self.pushes
            .borrow_mut()
            .push((remote.to_string(), branch.to_string()));
        self.check(Stage::Pushed, &name)
    }
}

impl Shell for World {
    fn run(&self, _command_line: &str, cwd: &Path) -> gh_bulk::Result<CommandOutput> {
        let name = name_of(cwd);
        self.record("run", &name);
        let code = if self.fail.get(&name) == Some(&Stage::CommandRun) {
            2
        } else {
            0
        };
        Ok(CommandOutput {
            code: Some(code),
            output: "some output".into(),
        })
    }
}

impl PullRequestOps for World {
    fn create_pull_request(
        &self,
        repo: &RepositoryRef,
        pr: &CreatePullRequest,
    ) -> gh_bulk::Result<PullRequest> {
        self.record("pr", &repo.name);
        self.check(Stage::PROpened, &repo.name)?;
        self.pull_requests
            .borrow_mut()
            .push((repo.name.clone(), pr.clone()));
        Ok(PullRequest {
            number: 1,
            html_url: format!("https://github.com/{}/pull/1", repo.full_name),
            title: pr.title.clone(),
        })
    }
}

pub fn repos(names: &[&str]) -> Vec<RepositoryRef> {
    names
        .iter()
        .map(|n| {
            RepositoryRef::new(
                *n,
                format!("acme/{}", n),
                format!("git@github.com:acme/{}.git", n),
                "main",
            )
        })
        .collect()
}
