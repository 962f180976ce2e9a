//! Search-related models for queries and rendered views.

use serde::{Deserialize, Serialize};

use super::document::IndexedDocument;

/// Output format for CLI rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Machine-parseable JSON format
    Json,
    /// Documentation-friendly Markdown format
    Markdown,
    /// Search widget markup
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

/// What the results area shows after an input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "results", rename_all = "snake_case")]
pub enum SearchView<'a> {
    /// Query too short; the results area is emptied.
    Cleared,
    /// Query ran but nothing matched.
    NoResults,
    /// Matching documents in index order.
    Results(Vec<&'a IndexedDocument>),
}

impl<'a> SearchView<'a> {
    pub fn from_matches(matches: Vec<&'a IndexedDocument>) -> Self {
        if matches.is_empty() {
            SearchView::NoResults
        } else {
            SearchView::Results(matches)
        }
    }

    pub fn documents(&self) -> &[&'a IndexedDocument] {
        match self {
            SearchView::Results(docs) => docs,
            SearchView::Cleared | SearchView::NoResults => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.documents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents().is_empty()
    }
}

/// A rendered search, as printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<'a> {
    /// Query exactly as typed
    pub query: String,

    pub view: SearchView<'a>,

    /// Time spent filtering, in microseconds
    pub duration_us: u64,
}

impl<'a> SearchResults<'a> {
    pub fn new(query: impl Into<String>, view: SearchView<'a>, duration_us: u64) -> Self {
        Self {
            query: query.into(),
            view,
            duration_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "md".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_view_from_matches() {
        assert_eq!(SearchView::from_matches(vec![]), SearchView::NoResults);

        let doc = IndexedDocument::new("T", "C", vec![], "/t/", "E");
        let view = SearchView::from_matches(vec![&doc]);
        assert_eq!(view.len(), 1);
        assert!(SearchView::Cleared.is_empty());
    }

    #[test]
    fn test_view_serializes_state() {
        let results = SearchResults::new("a", SearchView::Cleared, 3);
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["view"]["state"], "cleared");
        assert_eq!(json["query"], "a");
    }
}
