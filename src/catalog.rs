//! Repository catalog: the complete, name-ordered set of repositories under
//! one owner that match a free-text query.
//!
//! The catalog is fully materialized before selection. Paging stops exactly
//! when the number of fetched items equals the total count the endpoint
//! reports; any page failure aborts the whole listing.
//!
//! A reported total that is too low stops paging early. A total that is too
//! high would otherwise page forever: once a page comes back empty before the
//! total is reached, listing fails with [`BulkError::Catalog`] instead.

use crate::error::{BulkError, Result};

/// A repository the pipeline can operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    /// Short name, unique within one catalog.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// URL passed to the version-control collaborator for cloning.
    pub remote_url: String,
    /// Base branch for pull requests.
    pub default_branch: String,
}

impl RepositoryRef {
    pub fn new(
        name: impl Into<String>,
        full_name: impl Into<String>,
        remote_url: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            remote_url: remote_url.into(),
            default_branch: default_branch.into(),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<RepositoryRef>,
    /// Total matches across all pages, as reported by the endpoint.
    pub total_count: usize,
}

/// Paginated repository search. Pages are numbered from 1.
pub trait RepoSearch {
    fn search(&self, owner: &str, query: &str, page: u32) -> Result<SearchPage>;
}

/// Search qualifier restricting `query` to repositories of `owner`.
///
/// An empty query yields just the owner qualifier, i.e. every repository.
pub fn search_terms(owner: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        format!("user:{}", owner)
    } else {
        format!("{} user:{}", query, owner)
    }
}

/// Lists repositories through a [`RepoSearch`] collaborator.
pub struct Catalog<'a> {
    search: &'a dyn RepoSearch,
}

impl<'a> Catalog<'a> {
    pub fn new(search: &'a dyn RepoSearch) -> Self {
        Self { search }
    }

    /// Fetch every matching repository, sorted by name ascending.
    ///
    /// Fails with [`BulkError::Catalog`] when a page is empty before the
    /// reported total has been fetched.
    pub fn list(&self, owner: &str, query: &str) -> Result<Vec<RepositoryRef>> {
        let mut repos: Vec<RepositoryRef> = Vec::new();
        let mut page = 1;

        loop {
            let result = self.search.search(owner, query, page)?;
            tracing::debug!(
                page,
                items = result.items.len(),
                total = result.total_count,
                "fetched catalog page"
            );

            if result.items.is_empty() && repos.len() != result.total_count {
                return Err(BulkError::Catalog {
                    message: format!(
                        "page {} was empty after {} of {} repositories",
                        page,
                        repos.len(),
                        result.total_count
                    ),
                });
            }

            repos.extend(result.items);

            if repos.len() == result.total_count {
                break;
            }

            page += 1;
        }

        repos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Serves `names` in pages of `page_size`, in scrambled order.
    struct FakeSearch {
        names: Vec<String>,
        page_size: usize,
        reported_total: Option<usize>,
        fail_on_page: Option<u32>,
        calls: RefCell<Vec<(String, String, u32)>>,
    }

    impl FakeSearch {
        fn new(total: usize, page_size: usize) -> Self {
            let mut names: Vec<String> = (0..total).map(|i| format!("repo-{:03}", i)).collect();
            names.reverse();
            Self {
                names,
                page_size,
                reported_total: None,
                fail_on_page: None,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl RepoSearch for FakeSearch {
        fn search(&self, owner: &str, query: &str, page: u32) -> Result<SearchPage> {
            self.calls
                .borrow_mut()
                .push((owner.to_string(), query.to_string(), page));

            if self.fail_on_page == Some(page) {
                return Err(BulkError::GitHub {
                    message: "rate limited".into(),
                });
            }

            let start = (page as usize - 1) * self.page_size;
            let items = self
                .names
                .iter()
                .skip(start)
                .take(self.page_size)
                .map(|n| {
                    RepositoryRef::new(
                        n,
                        format!("{}/{}", owner, n),
                        format!("git@github.com:{}/{}.git", owner, n),
                        "main",
                    )
                })
                .collect();

            Ok(SearchPage {
                items,
                total_count: self.reported_total.unwrap_or(self.names.len()),
            })
        }
    }

    #[test]
    fn test_pages_until_total_count() {
        for (total, page_size) in [(1, 30), (30, 30), (31, 30), (95, 30), (7, 2)] {
            let fake = FakeSearch::new(total, page_size);
            let repos = Catalog::new(&fake).list("acme", "").unwrap();

            assert_eq!(repos.len(), total);
            assert_eq!(fake.calls.borrow().len(), total.div_ceil(page_size));

            let names: Vec<_> = repos.iter().map(|r| r.name.clone()).collect();
            let mut sorted = names.clone();
            sorted.sort();
            assert_eq!(names, sorted);
        }
    }

    #[test]
    fn test_empty_catalog_needs_one_request() {
        let fake = FakeSearch::new(0, 30);
        let repos = Catalog::new(&fake).list("acme", "").unwrap();

        assert!(repos.is_empty());
        assert_eq!(fake.calls.borrow().len(), 1);
    }

    #[test]
    fn test_page_numbers_increase_from_one() {
        let fake = FakeSearch::new(5, 2);
        Catalog::new(&fake).list("acme", "widgets").unwrap();

        let calls = fake.calls.borrow();
        let pages: Vec<u32> = calls.iter().map(|c| c.2).collect();
        assert_eq!(pages, vec![1, 2, 3]);
        assert!(calls.iter().all(|c| c.0 == "acme" && c.1 == "widgets"));
    }

    #[test]
    fn test_page_failure_aborts_listing() {
        let mut fake = FakeSearch::new(10, 3);
        fake.fail_on_page = Some(2);

        let result = Catalog::new(&fake).list("acme", "");
        assert!(matches!(result, Err(BulkError::GitHub { .. })));
    }

    #[test]
    fn test_underreported_total_stops_early() {
        let mut fake = FakeSearch::new(10, 3);
        fake.reported_total = Some(3);

        let repos = Catalog::new(&fake).list("acme", "").unwrap();
        assert_eq!(repos.len(), 3);
        assert_eq!(fake.calls.borrow().len(), 1);
    }

    #[test]
    fn test_overreported_total_errors_on_empty_page() {
        let mut fake = FakeSearch::new(4, 3);
        fake.reported_total = Some(20);

        let result = Catalog::new(&fake).list("acme", "");
        assert!(matches!(result, Err(BulkError::Catalog { .. })));
        assert_eq!(fake.calls.borrow().len(), 3);
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(search_terms("acme", ""), "user:acme");
        assert_eq!(search_terms("acme", "   "), "user:acme");
        assert_eq!(search_terms("acme", "lang:rust"), "lang:rust user:acme");
    }
}
