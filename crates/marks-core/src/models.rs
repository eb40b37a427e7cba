//! Data models for marks
//!
//! Defines the `Bookmark` entity, its tag normalization rules, and the
//! structured patch type used for partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A saved bookmark with metadata
///
/// The serde representation matches the JSON interchange format: `tags` is
/// rendered as a list of tokens, timestamps as RFC 3339 strings, and `id`
/// as a number or null.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    /// Storage-assigned identifier, `None` until persisted
    #[serde(default)]
    pub id: Option<i64>,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// The URL (unique at the storage layer)
    pub url: String,
    /// Optional free-form description
    #[serde(default)]
    pub description: String,
    /// Normalized comma-joined tags; `None` when untagged
    #[serde(
        default,
        serialize_with = "serialize_tags",
        deserialize_with = "deserialize_tags"
    )]
    pub tags: Option<String>,
    /// When this bookmark was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// When this bookmark was last modified
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    /// Number of recorded visits
    #[serde(default)]
    pub visit_count: i64,
}

impl Bookmark {
    /// Create a new unsaved bookmark for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: String::new(),
            url: url.into(),
            description: String::new(),
            tags: None,
            created_at: now,
            updated_at: now,
            visit_count: 0,
        }
    }

    /// Get the tags as an ordered list of tokens
    ///
    /// Tokens are trimmed; empty segments are dropped. Returns an empty
    /// list when no tags are set.
    pub fn tags_as_list(&self) -> Vec<String> {
        match &self.tags {
            Some(tags) => split_tags(tags),
            None => Vec::new(),
        }
    }

    /// Set the tags from a list of tokens
    ///
    /// Tokens are trimmed and empty or whitespace-only entries are dropped;
    /// the order of surviving tokens is preserved. An empty surviving list
    /// clears the tags entirely.
    pub fn set_tags_from_list<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = join_tags(tokens);
    }
}

/// Split a comma-joined tag string into normalized tokens
pub(crate) fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tag tokens into the canonical comma-separated form
///
/// Returns `None` when no non-empty tokens survive normalization.
pub(crate) fn join_tags<I, S>(tokens: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let normalized: Vec<String> = tokens
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized.join(","))
    }
}

fn serialize_tags<S>(tags: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let list = match tags {
        Some(tags) => split_tags(tags),
        None => Vec::new(),
    };
    list.serialize(serializer)
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tokens: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(tokens.and_then(join_tags))
}

/// A partial update for a stored bookmark
///
/// Only the mutable fields are representable; `id` and `created_at` cannot
/// be patched. `None` fields are left untouched by the storage engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    /// Replacement tag list, normalized on apply
    pub tags: Option<Vec<String>>,
}

impl BookmarkPatch {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.tags.is_none()
    }
}

/// Field scope for substring search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Url,
    Tags,
    Description,
    /// Match if the query occurs in any of title, url, tags, or description
    All,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Url => "url",
            SearchField::Tags => "tags",
            SearchField::Description => "description",
            SearchField::All => "all",
        }
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "url" => Ok(SearchField::Url),
            "tags" => Ok(SearchField::Tags),
            "description" => Ok(SearchField::Description),
            "all" => Ok(SearchField::All),
            other => Err(format!(
                "unknown search field '{}' (expected title, url, tags, description, or all)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_new() {
        let bookmark = Bookmark::new("https://example.com");
        assert_eq!(bookmark.url, "https://example.com");
        assert!(bookmark.id.is_none());
        assert!(bookmark.title.is_empty());
        assert!(bookmark.description.is_empty());
        assert!(bookmark.tags.is_none());
        assert_eq!(bookmark.visit_count, 0);
    }

    #[test]
    fn test_tags_as_list() {
        let mut bookmark = Bookmark::new("https://example.com");
        bookmark.tags = Some("python,programming,web".to_string());
        assert_eq!(bookmark.tags_as_list(), vec!["python", "programming", "web"]);

        bookmark.tags = None;
        assert!(bookmark.tags_as_list().is_empty());
    }

    #[test]
    fn test_tags_as_list_trims_and_drops_empty() {
        let mut bookmark = Bookmark::new("https://example.com");
        bookmark.tags = Some(" rust , , web ,".to_string());
        assert_eq!(bookmark.tags_as_list(), vec!["rust", "web"]);
    }

    #[test]
    fn test_set_tags_from_list() {
        let mut bookmark = Bookmark::new("https://example.com");
        bookmark.set_tags_from_list(["python", "programming", "web"]);
        assert_eq!(bookmark.tags, Some("python,programming,web".to_string()));

        bookmark.set_tags_from_list(["python", "", "programming", "  "]);
        assert_eq!(bookmark.tags, Some("python,programming".to_string()));
    }

    #[test]
    fn test_set_tags_from_empty_list_clears() {
        let mut bookmark = Bookmark::new("https://example.com");
        bookmark.set_tags_from_list(["rust"]);
        assert!(bookmark.tags.is_some());

        bookmark.set_tags_from_list(["", "   "]);
        assert!(bookmark.tags.is_none());
        assert!(bookmark.tags_as_list().is_empty());
    }

    #[test]
    fn test_tag_normalization_idempotent() {
        let mut bookmark = Bookmark::new("https://example.com");
        bookmark.set_tags_from_list(["a", "", "  ", "b"]);
        assert_eq!(bookmark.tags_as_list(), vec!["a", "b"]);

        let once = bookmark.tags.clone();
        let list = bookmark.tags_as_list();
        bookmark.set_tags_from_list(list);
        assert_eq!(bookmark.tags, once);
        assert_eq!(bookmark.tags_as_list(), vec!["a", "b"]);
    }

    #[test]
    fn test_serialize_tags_as_list() {
        let mut bookmark = Bookmark::new("https://example.com");
        bookmark.title = "Test".to_string();
        bookmark.set_tags_from_list(["test", "demo"]);

        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(json["title"], "Test");
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["tags"], serde_json::json!(["test", "demo"]));
        assert_eq!(json["id"], serde_json::Value::Null);
        assert_eq!(json["visit_count"], 0);
    }

    #[test]
    fn test_deserialize_from_interchange() {
        let data = serde_json::json!({
            "id": 1,
            "title": "Test",
            "url": "https://example.com",
            "description": "Test description",
            "tags": ["test", "demo"],
            "created_at": "2023-01-01T00:00:00Z",
            "updated_at": "2023-01-01T00:00:00Z",
            "visit_count": 5
        });

        let bookmark: Bookmark = serde_json::from_value(data).unwrap();
        assert_eq!(bookmark.id, Some(1));
        assert_eq!(bookmark.title, "Test");
        assert_eq!(bookmark.tags, Some("test,demo".to_string()));
        assert_eq!(bookmark.visit_count, 5);
    }

    #[test]
    fn test_deserialize_defaults_missing_fields() {
        let bookmark: Bookmark =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert!(bookmark.id.is_none());
        assert!(bookmark.title.is_empty());
        assert!(bookmark.description.is_empty());
        assert!(bookmark.tags.is_none());
        assert_eq!(bookmark.visit_count, 0);
    }

    #[test]
    fn test_deserialize_normalizes_tags() {
        let bookmark: Bookmark = serde_json::from_str(
            r#"{"url": "https://example.com", "tags": [" rust ", "", "web"]}"#,
        )
        .unwrap();
        assert_eq!(bookmark.tags, Some("rust,web".to_string()));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut bookmark = Bookmark::new("https://example.com");
        bookmark.title = "Example".to_string();
        bookmark.description = "A site".to_string();
        bookmark.set_tags_from_list(["one", "two"]);
        bookmark.visit_count = 3;

        let json = serde_json::to_string(&bookmark).unwrap();
        let deserialized: Bookmark = serde_json::from_str(&json).unwrap();
        assert_eq!(bookmark, deserialized);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(BookmarkPatch::default().is_empty());

        let patch = BookmarkPatch {
            title: Some("X".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_search_field_from_str() {
        use std::str::FromStr;

        assert_eq!(SearchField::from_str("title").unwrap(), SearchField::Title);
        assert_eq!(SearchField::from_str("TAGS").unwrap(), SearchField::Tags);
        assert_eq!(SearchField::from_str("all").unwrap(), SearchField::All);
        assert!(SearchField::from_str("body").is_err());
    }

    #[test]
    fn test_search_field_display() {
        assert_eq!(SearchField::Description.to_string(), "description");
        assert_eq!(SearchField::All.to_string(), "all");
    }
}
