//! Run settings resolved from the environment.

use crate::error::{BulkError, Result};
use crate::git::{CommitAuthor, GitAuth};
use std::path::PathBuf;

/// Which remote URL of a repository is cloned and pushed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CloneProtocol {
    /// `git@github.com:owner/name.git`, authenticated through the SSH agent.
    #[default]
    Ssh,
    /// `https://github.com/owner/name.git`, authenticated with the API token.
    Https,
}

impl std::str::FromStr for CloneProtocol {
    type Err = BulkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssh" => Ok(Self::Ssh),
            "https" => Ok(Self::Https),
            other => Err(BulkError::InvalidConfig(format!(
                "Unknown clone protocol '{}' (expected ssh or https)",
                other
            ))),
        }
    }
}

/// Settings shared by every component of one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding `config.yaml`.
    pub config_dir: PathBuf,
    pub api_base_url: String,
    pub token: String,
    pub protocol: CloneProtocol,
    pub author: CommitAuthor,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("GH_TOKEN").or_else(|| get("GITHUB_TOKEN")).ok_or_else(|| {
            BulkError::InvalidConfig("Neither GH_TOKEN nor GITHUB_TOKEN is set".into())
        })?;

        let config_dir = match get("GH_BULK_CONFIG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| {
                    BulkError::InvalidConfig("Could not determine config directory".into())
                })?
                .join("gh-bulk"),
        };

        let protocol = match get("GH_BULK_PROTOCOL") {
            Some(p) => p.parse()?,
            None => CloneProtocol::default(),
        };

        let default_author = CommitAuthor::default();
        let author = CommitAuthor::new(
            get("GH_BULK_AUTHOR_NAME").unwrap_or(default_author.name),
            get("GH_BULK_AUTHOR_EMAIL").unwrap_or(default_author.email),
        );

        Ok(Self {
            config_dir,
            api_base_url: get("GITHUB_API_URL")
                .unwrap_or_else(|| "https://api.github.com".to_string()),
            token,
            protocol,
            author,
        })
    }

    /// Path of the persisted profile store.
    pub fn profile_path(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }

    /// Credentials for clone and push over the configured protocol.
    pub fn git_auth(&self) -> GitAuth {
        match self.protocol {
            CloneProtocol::Ssh => GitAuth::Agent,
            CloneProtocol::Https => GitAuth::token(&self.token),
        }
    }
}
