use std::collections::HashSet;
use std::sync::Arc;

use futures::future;

use crate::error::ServiceError;
use crate::planner::{BranchOrder, Field, QueryDescriptor};
use crate::store::{DocumentStore, Page};
use crate::types::{SuggestionItem, SuggestionKind};

/// Per-field cap on suggestion lookups.
pub const SUGGESTION_LIMIT: usize = 3;

/// Bounded prefix lookups over artist, genre, and mood, merged into typed
/// suggestion entries.
pub struct SuggestionEngine {
    store: Arc<dyn DocumentStore>,
}

impl SuggestionEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Empty or whitespace-only input short-circuits with no store call.
    pub async fn suggest(&self, query: &str) -> Result<Vec<SuggestionItem>, ServiceError> {
        let text = query.trim().to_lowercase();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let fields = [
            (Field::Artist, SuggestionKind::Artist),
            (Field::Genre, SuggestionKind::Genre),
            (Field::Mood, SuggestionKind::Mood),
        ];

        let pages = future::try_join_all(fields.iter().map(|(field, _)| {
            let descriptor = QueryDescriptor::prefix(
                *field,
                &text,
                BranchOrder::FieldAscUploadDesc,
                SUGGESTION_LIMIT,
            );
            let store = self.store.clone();
            async move { store.run(&descriptor).await }
        }))
        .await?;

        let mut suggestions = Vec::new();
        for ((field, kind), page) in fields.iter().zip(pages) {
            collect_field(&mut suggestions, *field, *kind, page);
        }
        Ok(suggestions)
    }
}

/// Pull the target field out of each record, dropping duplicates while
/// keeping the store's ascending order and the value's stored casing.
fn collect_field(
    out: &mut Vec<SuggestionItem>,
    field: Field,
    kind: SuggestionKind,
    page: Page,
) {
    let mut seen: HashSet<String> = HashSet::new();
    for record in page.records {
        let value = match field {
            Field::Artist => Some(record.artist),
            Field::Genre => record.genre,
            Field::Mood => record.mood,
            Field::Title | Field::Tags => None,
        };
        if let Some(text) = value {
            if seen.insert(text.clone()) {
                out.push(SuggestionItem { kind, text });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MediaRecord, MemoryStore};
    use crate::types::Timestamp;

    fn record(id: &str, artist: &str, genre: Option<&str>, mood: Option<&str>) -> MediaRecord {
        MediaRecord {
            id: id.to_string(),
            title: format!("title-{id}"),
            artist: artist.to_string(),
            uploaded_at: Some(Timestamp::new(100, 0)),
            tags: None,
            genre: genre.map(str::to_string),
            mood: mood.map(str::to_string),
        }
    }

    fn engine() -> SuggestionEngine {
        let store = MemoryStore::new(vec![
            record("v1", "Calypso Kings", Some("calypso"), None),
            record("v2", "Caro", Some("calm jazz"), Some("calm")),
            record("v3", "Caro", None, Some("carefree")),
            record("v4", "Beta Waves", Some("ambient"), Some("calm")),
        ]);
        SuggestionEngine::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_empty_query_returns_empty_without_store_call() {
        struct PanickingStore;

        #[async_trait::async_trait]
        impl DocumentStore for PanickingStore {
            async fn run(&self, _: &QueryDescriptor) -> Result<Page, ServiceError> {
                panic!("store must not be called for an empty query");
            }
        }

        let engine = SuggestionEngine::new(Arc::new(PanickingStore));
        assert!(engine.suggest("").await.unwrap().is_empty());
        assert!(engine.suggest("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_types_are_flattened_artist_genre_mood() {
        let suggestions = engine().suggest("ca").await.unwrap();
        let kinds: Vec<SuggestionKind> = suggestions.iter().map(|s| s.kind).collect();

        let first_genre = kinds.iter().position(|k| *k == SuggestionKind::Genre);
        let first_mood = kinds.iter().position(|k| *k == SuggestionKind::Mood);
        let last_artist = kinds.iter().rposition(|k| *k == SuggestionKind::Artist);
        assert!(last_artist < first_genre);
        assert!(first_genre < first_mood);
    }

    #[tokio::test]
    async fn test_duplicate_values_collapse_within_a_field() {
        let suggestions = engine().suggest("ca").await.unwrap();
        let artists: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Artist)
            .map(|s| s.text.as_str())
            .collect();
        // Two records by "Caro" yield one suggestion, ascending order kept.
        assert_eq!(artists, vec!["Calypso Kings", "Caro"]);
    }

    #[tokio::test]
    async fn test_each_field_caps_at_three() {
        let store = MemoryStore::new(
            (0..10)
                .map(|i| record(&format!("v{i}"), &format!("band {i}"), None, None))
                .collect(),
        );
        let engine = SuggestionEngine::new(Arc::new(store));
        let suggestions = engine.suggest("band").await.unwrap();
        assert_eq!(suggestions.len(), SUGGESTION_LIMIT);
        assert!(suggestions.iter().all(|s| s.kind == SuggestionKind::Artist));
    }
}
