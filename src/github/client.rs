//! GitHub API client.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::error::{BulkError, Result};

/// Client for interacting with the GitHub REST API.
#[derive(Clone)]
pub struct GitHubClient {
    pub(crate) token: String,
    pub(crate) base_url: String,
    pub(crate) client: Client,
}

#[derive(Debug, Deserialize)]
struct AuthenticatedUser {
    login: String,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, "https://api.github.com")
    }

    /// Create a client against a custom API root (GitHub Enterprise).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        Self {
            token: token.into(),
            base_url: url,
            client: Client::new(),
        }
    }

    /// Get the default headers for API requests.
    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token)).map_err(|_| {
            BulkError::InvalidConfig("GitHub token contains invalid header characters".into())
        })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("gh-bulk"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Make a GET request to the GitHub API.
    pub(crate) fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).headers(self.headers()?).send()?;

        Self::decode(response)
    }

    /// Make a POST request to the GitHub API.
    pub(crate) fn post<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(body)
            .send()?;

        Self::decode(response)
    }

    fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(BulkError::GitHub {
                message: format!("API request failed ({}): {}", status, body),
            });
        }

        response.json().map_err(|e| BulkError::GitHub {
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// Login of the account the token belongs to.
    pub fn current_login(&self) -> Result<String> {
        let user: AuthenticatedUser = self.get("/user")?;
        Ok(user.login)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
