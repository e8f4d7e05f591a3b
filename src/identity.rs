//! Identity resolution: which account's repositories a login operates on.
//!
//! The first run under a login asks whether it acts as an individual or on
//! behalf of an organization and records the answer in the profile store.
//! Later runs under the same login reuse the stored owner without asking.

use crate::error::{BulkError, Result};
use crate::form::{Form, ask_until_valid};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Whether a login queries its own repositories or an organization's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Individual,
    Organization,
}

/// A recorded mapping from an authenticated login to its effective owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// The authenticated login; unique within the store.
    pub name: String,
    pub kind: AccountKind,
    /// Owner whose repositories are searched.
    pub owner: String,
}

impl AccountProfile {
    pub fn individual(login: impl Into<String>) -> Self {
        let login = login.into();
        Self {
            owner: login.clone(),
            name: login,
            kind: AccountKind::Individual,
        }
    }

    pub fn organization(login: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            name: login.into(),
            kind: AccountKind::Organization,
            owner: org.into(),
        }
    }
}

/// Profiles persisted as a YAML list; every change rewrites the whole file.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: Vec<AccountProfile>,
}

impl ProfileStore {
    /// Load the store at `path`, creating its directory if needed.
    ///
    /// A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| store_error(&path, e))?;
        }

        let profiles = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_yaml::from_str(&content).map_err(|e| store_error(&path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(store_error(&path, e)),
        };

        Ok(Self { path, profiles })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn profiles(&self) -> &[AccountProfile] {
        &self.profiles
    }

    pub fn find(&self, login: &str) -> Option<&AccountProfile> {
        self.profiles.iter().find(|p| p.name == login)
    }

    /// Record a new profile and persist the store.
    pub fn add(&mut self, profile: AccountProfile) -> Result<()> {
        if self.find(&profile.name).is_some() {
            return Err(BulkError::ProfileStore {
                path: self.path.clone(),
                message: format!("profile for '{}' already exists", profile.name),
            });
        }
        self.profiles.push(profile);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let content =
            serde_yaml::to_string(&self.profiles).map_err(|e| store_error(&self.path, e))?;
        std::fs::write(&self.path, content).map_err(|e| store_error(&self.path, e))
    }
}

fn store_error(path: &Path, e: impl std::fmt::Display) -> BulkError {
    BulkError::ProfileStore {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Return the effective owner for `login`, prompting for and persisting a new
/// profile the first time the login is seen.
pub fn resolve_owner(store: &mut ProfileStore, login: &str, form: &mut dyn Form) -> Result<String> {
    if let Some(profile) = store.find(login) {
        tracing::debug!(login, owner = %profile.owner, "using stored profile");
        return Ok(profile.owner.clone());
    }

    form.notice(&format!("Current GitHub User: {}\n", login))?;
    let kinds = ["Individual".to_string(), "Organization".to_string()];
    let profile = match form.select("Select User type", &kinds)? {
        0 => AccountProfile::individual(login),
        _ => {
            let org = ask_until_valid(
                form,
                |f| f.input("Enter Organization name", ""),
                |s| {
                    if s.trim().is_empty() {
                        Err(BulkError::Invalid("Organization name required".into()))
                    } else {
                        Ok(())
                    }
                },
            )?;
            AccountProfile::organization(login, org.trim())
        }
    };

    let owner = profile.owner.clone();
    store.add(profile)?;
    tracing::info!(login, %owner, path = %store.path().display(), "recorded new profile");
    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::TerminalForm;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn form(input: &str) -> TerminalForm<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalForm::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_missing_file_is_empty_and_creates_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/gh-bulk/config.yaml");

        let store = ProfileStore::load(&path).unwrap();
        assert!(store.profiles().is_empty());
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_new_individual_login_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut store = ProfileStore::load(&path).unwrap();

        let owner = resolve_owner(&mut store, "octocat", &mut form("1\n")).unwrap();
        assert_eq!(owner, "octocat");

        let reloaded = ProfileStore::load(&path).unwrap();
        assert_eq!(reloaded.profiles(), &[AccountProfile::individual("octocat")]);
    }

    #[test]
    fn test_new_organization_login_prompts_for_org() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut store = ProfileStore::load(&path).unwrap();

        let owner = resolve_owner(&mut store, "octocat", &mut form("2\n\n acme \n")).unwrap();
        assert_eq!(owner, "acme");

        let reloaded = ProfileStore::load(&path).unwrap();
        let profile = reloaded.find("octocat").unwrap();
        assert_eq!(profile.kind, AccountKind::Organization);
        assert_eq!(profile.owner, "acme");
    }

    #[test]
    fn test_known_login_does_not_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "- name: octocat\n  kind: organization\n  owner: acme\n").unwrap();

        let mut store = ProfileStore::load(&path).unwrap();
        let mut f = form("");
        let owner = resolve_owner(&mut store, "octocat", &mut f).unwrap();

        assert_eq!(owner, "acme");
        assert!(f.into_writer().is_empty());
    }

    #[test]
    fn test_second_login_appends_and_rewrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut store = ProfileStore::load(&path).unwrap();

        resolve_owner(&mut store, "alice", &mut form("1\n")).unwrap();
        resolve_owner(&mut store, "bob", &mut form("2\nbobcorp\n")).unwrap();

        let reloaded = ProfileStore::load(&path).unwrap();
        assert_eq!(reloaded.profiles().len(), 2);
        assert_eq!(reloaded.find("alice").unwrap().owner, "alice");
        assert_eq!(reloaded.find("bob").unwrap().owner, "bobcorp");
    }

    #[test]
    fn test_aborted_prompt_persists_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut store = ProfileStore::load(&path).unwrap();

        let result = resolve_owner(&mut store, "octocat", &mut form(""));
        assert!(matches!(result, Err(BulkError::Aborted)));
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "{not: [valid").unwrap();

        assert!(matches!(
            ProfileStore::load(&path),
            Err(BulkError::ProfileStore { .. })
        ));
    }
}
