//! Run-scoped directory holding one local checkout per repository.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Root directory for the checkouts of one run.
///
/// Checkouts are keyed by repository name, so two repositories with the same
/// name under different owners would share a path.
pub struct Workspace {
    root: PathBuf,
    _temp: Option<TempDir>,
}

impl Workspace {
    /// A fresh temporary root, removed when the workspace is dropped.
    pub fn temporary() -> io::Result<Self> {
        let temp = tempfile::Builder::new().prefix("gh-bulk-").tempdir()?;
        Ok(Self {
            root: temp.path().to_path_buf(),
            _temp: Some(temp),
        })
    }

    /// Use an existing directory as the root.
    pub fn at(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, _temp: None })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Claim the checkout path for `name`.
    pub fn checkout(&self, name: &str) -> Checkout {
        Checkout {
            path: self.root.join(name),
            released: false,
        }
    }
}

/// A claimed checkout path that is removed exactly once.
///
/// [`Checkout::release`] removes it and reports the outcome; if the guard is
/// dropped without being released (for example during unwinding) the path is
/// removed on drop and any error is logged.
#[derive(Debug)]
pub struct Checkout {
    path: PathBuf,
    released: bool,
}

impl Checkout {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Clear anything left at the path by an earlier run.
    pub fn prepare(&self) -> io::Result<()> {
        remove(&self.path)
    }

    pub fn release(mut self) -> io::Result<()> {
        self.released = true;
        remove(&self.path)
    }
}

impl Drop for Checkout {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = remove(&self.path)
        {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove checkout");
        }
    }
}

fn remove(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
