//! Substring search over a loaded site index.

use crate::models::{IndexedDocument, SearchView};
use crate::utils::utf16_len;

pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_RESULTS: usize = 10;

/// First `limit` documents matching `query`, in index order.
///
/// The query is lowercased but not trimmed.
pub fn filter_documents<'a>(
    documents: &'a [IndexedDocument],
    query: &str,
    limit: usize,
) -> Vec<&'a IndexedDocument> {
    let lowered = query.to_lowercase();
    documents
        .iter()
        .filter(|doc| doc.matches(&lowered))
        .take(limit)
        .collect()
}

/// Loaded index plus the rules applied to each input event.
#[derive(Debug, Clone)]
pub struct SearchSession {
    documents: Vec<IndexedDocument>,
    min_query_len: usize,
    max_results: usize,
}

impl SearchSession {
    pub fn new(documents: Vec<IndexedDocument>) -> Self {
        Self {
            documents,
            min_query_len: MIN_QUERY_LEN,
            max_results: MAX_RESULTS,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, min_query_len: usize, max_results: usize) -> Self {
        self.min_query_len = min_query_len;
        self.max_results = max_results.max(1);
        self
    }

    /// Compute the view for the current contents of the search box.
    pub fn on_input(&self, query: &str) -> SearchView<'_> {
        if utf16_len(&query.to_lowercase()) < self.min_query_len {
            return SearchView::Cleared;
        }
        SearchView::from_matches(filter_documents(&self.documents, query, self.max_results))
    }
}
