use serde::{Deserialize, Serialize};

/// A searchable page or post from the site index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub excerpt: String,
}

impl IndexedDocument {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        url: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags,
            url: url.into(),
            excerpt: excerpt.into(),
        }
    }

    /// Whether an already-lowercased query occurs in the title, content or any tag.
    pub fn matches(&self, lowered_query: &str) -> bool {
        self.title.to_lowercase().contains(lowered_query)
            || self.content.to_lowercase().contains(lowered_query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(lowered_query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> IndexedDocument {
        IndexedDocument::new(
            "Prompt Injection 101",
            "How attackers smuggle instructions into LLM input.",
            vec!["Security".to_string(), "LLM".to_string()],
            "/posts/prompt-injection/",
            "An introduction.",
        )
    }

    #[test]
    fn test_matches_title_content_and_tags() {
        let d = doc();
        assert!(d.matches("injection"));
        assert!(d.matches("smuggle"));
        assert!(d.matches("secur"));
        assert!(!d.matches("kubernetes"));
    }

    #[test]
    fn test_excerpt_and_url_are_not_searched() {
        let d = doc();
        assert!(!d.matches("introduction"));
        assert!(!d.matches("/posts/"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let d: IndexedDocument =
            serde_json::from_str(r#"{"title":"T","content":"C","url":"/t/"}"#).unwrap();
        assert!(d.tags.is_empty());
        assert!(d.excerpt.is_empty());
    }
}
