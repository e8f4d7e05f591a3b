//! Git authentication configuration.

use git2::{Cred, CredentialType, RemoteCallbacks};

/// Authentication method for git remote operations.
#[derive(Debug, Clone, Default)]
pub enum GitAuth {
    /// Token-based authentication (for HTTPS remotes).
    Token(String),
    /// SSH agent for SSH remotes, system defaults otherwise.
    #[default]
    Agent,
}

impl GitAuth {
    /// Create token-based auth (typically for GitHub HTTPS URLs).
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Build remote callbacks that answer credential requests with this auth.
    pub(crate) fn callbacks<'a>(&self) -> RemoteCallbacks<'a> {
        let auth = self.clone();
        let mut callbacks = RemoteCallbacks::new();

        callbacks.credentials(move |_url, username_from_url, allowed_types| match &auth {
            GitAuth::Token(token) => Cred::userpass_plaintext("x-access-token", token),
            GitAuth::Agent => {
                if allowed_types.contains(CredentialType::SSH_KEY) {
                    Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                } else {
                    Cred::default()
                }
            }
        });

        callbacks
    }
}
