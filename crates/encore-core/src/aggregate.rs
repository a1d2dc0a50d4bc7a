use std::collections::HashSet;
use std::sync::Arc;

use futures::future;
use tracing::warn;

use crate::error::ServiceError;
use crate::planner::QueryDescriptor;
use crate::store::{DocumentStore, Page};
use crate::types::SearchResultItem;

/// Runs planned branches concurrently and merges their pages into one
/// validated, ordered result list. Stateless between calls.
pub struct ResultAggregator {
    store: Arc<dyn DocumentStore>,
}

impl ResultAggregator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All-or-nothing fan-out: every descriptor runs in parallel and a
    /// single branch failure aborts the whole call.
    pub async fn collect(
        &self,
        descriptors: &[QueryDescriptor],
        limit: usize,
    ) -> Result<Vec<SearchResultItem>, ServiceError> {
        let pages = future::try_join_all(
            descriptors.iter().map(|descriptor| self.store.run(descriptor)),
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "search branch failed");
            e
        })?;

        Ok(merge_pages(pages, limit))
    }
}

/// Merge branch pages in submission order: stable first-occurrence dedup by
/// id, drop records with malformed upload timestamps, stable sort newest
/// first, truncate to `limit`.
pub fn merge_pages(pages: Vec<Page>, limit: usize) -> Vec<SearchResultItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut items: Vec<SearchResultItem> = Vec::new();

    for page in pages {
        for record in page.records {
            if !seen.insert(record.id.clone()) {
                continue;
            }
            let uploaded_at = match record.uploaded_at.filter(|ts| ts.is_well_formed()) {
                Some(ts) => ts,
                None => {
                    warn!(id = %record.id, "dropping record with malformed upload timestamp");
                    continue;
                }
            };
            items.push(SearchResultItem {
                id: record.id,
                title: record.title,
                artist: record.artist,
                uploaded_at,
                tags: record.tags,
                genre: record.genre,
                mood: record.mood,
            });
        }
    }

    // Stable sort: equal timestamps keep their pre-sort relative order.
    items.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    items.truncate(limit);
    items
}
