use serde::{Deserialize, Serialize};

/// Default and fallback result count for a search request.
pub const DEFAULT_LIMIT: usize = 20;

/// Upload timestamp as stored by the backing document store: a
/// seconds-since-epoch / nanoseconds pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// A timestamp is well-formed when seconds are non-negative and nanos
    /// stay within one second. Records failing this are dropped during
    /// aggregation, never surfaced.
    pub fn is_well_formed(&self) -> bool {
        self.seconds >= 0 && (0..1_000_000_000).contains(&self.nanos)
    }
}

/// Structured filters accompanying (or replacing) free-text query input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub artist: Option<String>,
    /// When false, the tag-containment branch is skipped. Absent means true.
    pub search_in_tags: Option<bool>,
}

impl SearchFilters {
    /// True when at least one equality filter (genre/mood/artist) is set.
    /// `search_in_tags` is a flag, not a filter, and does not count.
    pub fn has_equality_filters(&self) -> bool {
        self.genre.is_some() || self.mood.is_some() || self.artist.is_some()
    }
}

/// Inbound search request: free text, structured filters, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub filters: Option<SearchFilters>,
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// Trimmed query text, or None when absent or whitespace-only.
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn has_filters(&self) -> bool {
        self.filters
            .as_ref()
            .is_some_and(SearchFilters::has_equality_filters)
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_LIMIT)
    }
}

/// A validated catalog item as surfaced to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub uploaded_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

/// Which field a suggestion was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Artist,
    Genre,
    Mood,
    /// Reserved for client-side recent-search entries; the engine never
    /// emits it.
    Recent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub videos: Vec<SearchResultItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<SuggestionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_well_formed() {
        assert!(Timestamp::new(0, 0).is_well_formed());
        assert!(Timestamp::new(1_700_000_000, 999_999_999).is_well_formed());
        assert!(!Timestamp::new(-1, 0).is_well_formed());
        assert!(!Timestamp::new(10, 1_000_000_000).is_well_formed());
        assert!(!Timestamp::new(10, -1).is_well_formed());
    }

    #[test]
    fn test_timestamp_ordering_is_seconds_then_nanos() {
        let earlier = Timestamp::new(100, 500);
        let later = Timestamp::new(100, 501);
        assert!(later > earlier);
        assert!(Timestamp::new(101, 0) > later);
    }

    #[test]
    fn test_query_text_trims_and_rejects_blank() {
        let req = SearchRequest {
            query: Some("  rock  ".into()),
            ..Default::default()
        };
        assert_eq!(req.query_text(), Some("rock"));

        let blank = SearchRequest {
            query: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.query_text(), None);
    }

    #[test]
    fn test_search_in_tags_is_not_a_filter() {
        let filters = SearchFilters {
            search_in_tags: Some(true),
            ..Default::default()
        };
        assert!(!filters.has_equality_filters());

        let with_genre = SearchFilters {
            genre: Some("jazz".into()),
            ..Default::default()
        };
        assert!(with_genre.has_equality_filters());
    }

    #[test]
    fn test_effective_limit_defaults() {
        assert_eq!(SearchRequest::default().effective_limit(), DEFAULT_LIMIT);
        let req = SearchRequest {
            limit: Some(5),
            ..Default::default()
        };
        assert_eq!(req.effective_limit(), 5);
        let zero = SearchRequest {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.effective_limit(), DEFAULT_LIMIT);
    }
}
