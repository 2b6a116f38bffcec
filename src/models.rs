//! Data models shared by the sources, the aggregator and the renderers.
//!
//! - [`Article`]: one normalized item, whatever source it came from
//! - [`Category`]: the closed set of topic labels used for filtering
//! - [`NewsRequest`]: the immutable input of one aggregation cycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::RequestError;

/// Minimum number of characters a search query must have.
pub const MIN_QUERY_CHARS: usize = 2;

/// A normalized news item.
///
/// Sources only build an `Article` once they have a non-empty title and
/// url, so every value in circulation satisfies both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    /// `None` when the source sent a timestamp we could not parse.
    pub published_at: Option<DateTime<Utc>>,
    pub source_name: String,
    pub category: Category,
    /// Popularity as reported by the source. Never used for ordering.
    pub score: u64,
}

impl Article {
    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Newest first; articles without a valid timestamp go last.
    pub fn cmp_newest_first(a: &Article, b: &Article) -> Ordering {
        match (&a.published_at, &b.published_at) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Coarse topic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Business,
    Science,
    Sports,
    Health,
    Entertainment,
    Politics,
    General,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Technology,
        Category::Business,
        Category::Science,
        Category::Sports,
        Category::Health,
        Category::Entertainment,
        Category::Politics,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
            Category::Politics => "politics",
            Category::General => "general",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Technology => "💻",
            Category::Business => "💼",
            Category::Science => "🔬",
            Category::Sports => "⚽",
            Category::Health => "🏥",
            Category::Entertainment => "🎬",
            Category::Politics => "🏛️",
            Category::General => "📰",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| RequestError::UnknownCategory(s.to_string()))
    }
}

/// Input of one aggregation cycle.
///
/// Built through [`NewsRequest::new`], which is where query validation
/// happens; a value of this type is always safe to hand to the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsRequest {
    category: Option<Category>,
    query: Option<String>,
}

impl NewsRequest {
    /// Validate and build a request.
    ///
    /// The query is trimmed. `None` means no text filter; `Some` with fewer
    /// than [`MIN_QUERY_CHARS`] characters is rejected.
    pub fn new(category: Option<Category>, query: Option<&str>) -> Result<Self, RequestError> {
        let query = match query.map(str::trim) {
            None => None,
            Some(q) if q.chars().count() < MIN_QUERY_CHARS => {
                return Err(RequestError::QueryTooShort {
                    min: MIN_QUERY_CHARS,
                });
            }
            Some(q) => Some(q.to_string()),
        };
        Ok(Self { category, query })
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::article;
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>(), Ok(c));
        }
        assert_eq!("  Science ".parse::<Category>(), Ok(Category::Science));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert_eq!(
            "weather".parse::<Category>(),
            Err(RequestError::UnknownCategory("weather".to_string()))
        );
    }

    #[test]
    fn test_request_rejects_short_query() {
        assert_eq!(
            NewsRequest::new(None, Some("a")),
            Err(RequestError::QueryTooShort { min: 2 })
        );
        assert!(NewsRequest::new(None, Some("   ")).is_err());
        // trimmed before counting
        assert!(NewsRequest::new(None, Some(" x ")).is_err());
    }

    #[test]
    fn test_request_counts_characters_not_bytes() {
        assert!(NewsRequest::new(None, Some("é")).is_err());
        assert!(NewsRequest::new(None, Some("éé")).is_ok());
    }

    #[test]
    fn test_request_keeps_trimmed_query() {
        let req = NewsRequest::new(Some(Category::Science), Some("  rust ")).unwrap();
        assert_eq!(req.query(), Some("rust"));
        assert_eq!(req.category(), Some(Category::Science));
    }

    #[test]
    fn test_request_without_query() {
        let req = NewsRequest::new(None, None).unwrap();
        assert_eq!(req.query(), None);
        assert_eq!(req.category(), None);
    }

    #[test]
    fn test_matches_query_checks_title_and_description() {
        let mut a = article("Rust Release", Some(0), Category::Technology);
        a.description = "Compiler news".to_string();
        assert!(a.matches_query("rust"));
        assert!(a.matches_query("compiler"));
        assert!(!a.matches_query("python"));
    }

    #[test]
    fn test_newest_first_puts_missing_dates_last() {
        let old = article("Old", Some(1), Category::General);
        let new = article("New", Some(30), Category::General);
        let undated = article("Undated", None, Category::General);

        let mut v = vec![undated.clone(), old.clone(), new.clone()];
        v.sort_by(Article::cmp_newest_first);
        assert_eq!(v, vec![new, old, undated]);
    }

    #[test]
    fn test_article_serializes_camel_case() {
        let a = article("A", Some(0), Category::Science);
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["sourceName"], "Test");
        assert_eq!(json["category"], "science");
        assert!(json.get("imageUrl").is_some());
    }
}
