//! Name search over a walked tree.
//!
//! A query is immutable once built; running it never rewrites the key, so the
//! same query can be searched repeatedly with identical results.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::FsError;
use crate::walk::{self, Visit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    root: PathBuf,
    key: String,
    exact_match: bool,
    case_sensitive: bool,
}

impl SearchQuery {
    /// Start a query for `key` under `root`. Defaults: substring match, case-sensitive.
    pub fn builder(root: impl Into<PathBuf>, key: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder {
            query: SearchQuery {
                root: root.into(),
                key: key.into(),
                exact_match: false,
                case_sensitive: true,
            },
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn exact_match(&self) -> bool {
        self.exact_match
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether an entry's final name component satisfies this query.
    pub fn matches_name(&self, name: &str) -> bool {
        let (name, key) = if self.case_sensitive {
            (name.to_owned(), self.key.clone())
        } else {
            (name.to_lowercase(), self.key.to_lowercase())
        };
        if self.exact_match {
            name == key
        } else {
            name.contains(&key)
        }
    }

    fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|n| self.matches_name(&n.to_string_lossy()))
    }
}

#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    query: SearchQuery,
}

impl SearchQueryBuilder {
    pub fn exact_match(mut self, yes: bool) -> Self {
        self.query.exact_match = yes;
        self
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.query.case_sensitive = yes;
        self
    }

    pub fn build(self) -> SearchQuery {
        self.query
    }
}

/// Every visited entry whose name matches, in walk order.
/// Entries that fail during the walk are not candidates.
pub fn search(query: &SearchQuery, show_hidden: bool) -> Result<Vec<PathBuf>, FsError> {
    let mut hits = Vec::new();
    walk::visit(&query.root, show_hidden, |event| {
        if let Visit::Entry { path, .. } = event
            && query.matches_path(&path)
        {
            hits.push(path);
        }
    })?;
    debug!(
        root = %query.root.display(),
        key = %query.key,
        exact = query.exact_match,
        case_sensitive = query.case_sensitive,
        hits = hits.len(),
        "search finished"
    );
    Ok(hits)
}

/// True if at least one visited entry matches.
pub fn contains_match(query: &SearchQuery, show_hidden: bool) -> Result<bool, FsError> {
    let result = walk::walk(&query.root, show_hidden)?;
    Ok(result.visited.iter().any(|p| query.matches_path(p)))
}
