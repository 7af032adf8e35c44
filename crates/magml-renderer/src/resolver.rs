//! Lookups the generator needs from the surrounding content store.

use std::collections::{HashMap, HashSet};

/// A content item found by [`ContentResolver::resolve_content_item`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentItem {
    /// Full title shown as link text.
    pub title: String,
}

/// Content store queries used by `$$ref` and `$$ctree`.
///
/// "Not found" is a normal answer, never an error.
pub trait ContentResolver {
    /// Find a content item by id.
    fn resolve_content_item(&self, id: &str) -> Option<ContentItem>;

    /// Whether `name` is a known short keyword.
    fn is_short_keyword(&self, name: &str) -> bool;
}

/// Resolver that knows no content.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoContent;

impl ContentResolver for NoContent {
    fn resolve_content_item(&self, _id: &str) -> Option<ContentItem> {
        None
    }

    fn is_short_keyword(&self, _name: &str) -> bool {
        false
    }
}

/// In-memory resolver backed by an id to title map and a keyword set.
#[derive(Clone, Debug, Default)]
pub struct ContentIndex {
    titles: HashMap<String, String>,
    short_keywords: HashSet<String>,
}

impl ContentIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a content item.
    #[must_use]
    pub fn with_item(mut self, id: impl Into<String>, title: impl Into<String>) -> Self {
        self.insert_item(id, title);
        self
    }

    /// Register a short keyword.
    #[must_use]
    pub fn with_short_keyword(mut self, name: impl Into<String>) -> Self {
        self.short_keywords.insert(name.into());
        self
    }

    /// Register a content item in place.
    pub fn insert_item(&mut self, id: impl Into<String>, title: impl Into<String>) {
        self.titles.insert(id.into(), title.into());
    }
}

impl<S: Into<String>> Extend<S> for ContentIndex {
    /// Extend the short keyword set.
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.short_keywords.extend(iter.into_iter().map(Into::into));
    }
}

impl ContentResolver for ContentIndex {
    fn resolve_content_item(&self, id: &str) -> Option<ContentItem> {
        self.titles.get(id).map(|title| ContentItem {
            title: title.clone(),
        })
    }

    fn is_short_keyword(&self, name: &str) -> bool {
        self.short_keywords.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_content() {
        assert_eq!(NoContent.resolve_content_item("20050101000000"), None);
        assert!(!NoContent.is_short_keyword("rust"));
    }

    #[test]
    fn test_content_index() {
        let mut index = ContentIndex::new()
            .with_item("20050101000000", "New Year")
            .with_short_keyword("rust");
        index.extend(["cs"]);

        assert_eq!(
            index.resolve_content_item("20050101000000"),
            Some(ContentItem {
                title: "New Year".to_owned()
            })
        );
        assert_eq!(index.resolve_content_item("missing"), None);
        assert!(index.is_short_keyword("rust"));
        assert!(index.is_short_keyword("cs"));
        assert!(!index.is_short_keyword("go"));
    }
}
