//! Repository search backed by the GitHub search API.

use crate::catalog::{RepoSearch, RepositoryRef, SearchPage, search_terms};
use crate::config::CloneProtocol;
use crate::error::Result;
use crate::github::GitHubClient;
use serde::Deserialize;

/// Repository information from the GitHub search API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
    pub ssh_url: String,
    pub default_branch: String,
}

impl GitHubRepo {
    /// Convert to a pipeline reference using the given clone protocol.
    pub fn into_ref(self, protocol: CloneProtocol) -> RepositoryRef {
        let remote_url = match protocol {
            CloneProtocol::Ssh => self.ssh_url,
            CloneProtocol::Https => self.clone_url,
        };
        RepositoryRef::new(self.name, self.full_name, remote_url, self.default_branch)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: usize,
    #[serde(default)]
    items: Vec<GitHubRepo>,
}

/// [`RepoSearch`] over `GET /search/repositories`.
///
/// The page size is left to the endpoint.
pub struct GitHubSearch {
    client: GitHubClient,
    protocol: CloneProtocol,
}

impl GitHubSearch {
    pub fn new(client: GitHubClient, protocol: CloneProtocol) -> Self {
        Self { client, protocol }
    }
}

/// Endpoint path for one page of a search.
pub(crate) fn search_endpoint(owner: &str, query: &str, page: u32) -> String {
    format!(
        "/search/repositories?q={}&page={}&sort=name&order=asc",
        urlencoding::encode(&search_terms(owner, query)),
        page
    )
}

impl RepoSearch for GitHubSearch {
    fn search(&self, owner: &str, query: &str, page: u32) -> Result<SearchPage> {
        let response: SearchResponse = self.client.get(&search_endpoint(owner, query, page))?;

        Ok(SearchPage {
            total_count: response.total_count,
            items: response
                .items
                .into_iter()
                .map(|r| r.into_ref(self.protocol))
                .collect(),
        })
    }
}
