//! Pipeline stages and per-repository work state.

use crate::catalog::RepositoryRef;
use crate::error::BulkError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Stages of one repository's pass, in the only order they can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    NotStarted,
    Cloned,
    Branched,
    CommandRun,
    Pushed,
    PROpened,
    Cleaned,
}

impl Stage {
    /// The stage that follows this one, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::NotStarted => Some(Stage::Cloned),
            Stage::Cloned => Some(Stage::Branched),
            Stage::Branched => Some(Stage::CommandRun),
            Stage::CommandRun => Some(Stage::Pushed),
            Stage::Pushed => Some(Stage::PROpened),
            Stage::PROpened => Some(Stage::Cleaned),
            Stage::Cleaned => None,
        }
    }

    /// Name of the step that moves a repository into this stage.
    pub fn step(self) -> &'static str {
        match self {
            Stage::NotStarted => "start",
            Stage::Cloned => "clone",
            Stage::Branched => "create branch",
            Stage::CommandRun => "run command",
            Stage::Pushed => "commit and push",
            Stage::PROpened => "open pull request",
            Stage::Cleaned => "clean up",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.step())
    }
}

/// A step that failed, named by the stage it was trying to reach.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: BulkError,
}

impl StageFailure {
    pub fn new(stage: Stage, error: BulkError) -> Self {
        Self { stage, error }
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for StageFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Mutable state of one repository during its pass.
///
/// `local_path` is set exactly when `stage >= Cloned`. Clean-up always
/// records the released checkout path, so a pass that failed to clone still
/// ends `Cleaned` with a path.
#[derive(Debug)]
pub struct RepositoryWorkState {
    pub repository: RepositoryRef,
    local_path: Option<PathBuf>,
    stage: Stage,
    last_error: Option<StageFailure>,
}

impl RepositoryWorkState {
    pub fn new(repository: RepositoryRef) -> Self {
        Self {
            repository,
            local_path: None,
            stage: Stage::NotStarted,
            last_error: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }

    pub fn last_error(&self) -> Option<&StageFailure> {
        self.last_error.as_ref()
    }

    /// The stage the next step would reach.
    pub fn pending(&self) -> Stage {
        self.stage.next().unwrap_or(Stage::Cleaned)
    }

    /// Record that the clone landed at `path`.
    pub fn cloned(&mut self, path: &Path) {
        debug_assert_eq!(self.stage, Stage::NotStarted);
        self.local_path = Some(path.to_path_buf());
        self.stage = Stage::Cloned;
    }

    /// Advance by exactly one stage past `Cloned`.
    pub fn advance(&mut self, to: Stage) {
        debug_assert!(to > Stage::Cloned && to < Stage::Cleaned);
        debug_assert_eq!(self.stage.next(), Some(to));
        self.stage = to;
    }

    /// Record the step that stopped this pass. The stage is left unchanged.
    pub fn fail(&mut self, failure: StageFailure) {
        debug_assert_eq!(failure.stage, self.pending());
        self.last_error = Some(failure);
    }

    /// Mark the checkout at `released` as removed.
    pub fn cleaned(&mut self, released: &Path) {
        self.local_path.get_or_insert_with(|| released.to_path_buf());
        self.stage = Stage::Cleaned;
    }

    /// Take the recorded failure, if any.
    pub fn take_error(&mut self) -> Option<StageFailure> {
        self.last_error.take()
    }
}
