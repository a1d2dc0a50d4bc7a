use std::sync::Arc;

use tracing::{info, warn};

use crate::aggregate::ResultAggregator;
use crate::auth::TokenVerifier;
use crate::cache::{CacheKey, CacheStore};
use crate::error::ServiceError;
use crate::planner::QueryPlanner;
use crate::store::DocumentStore;
use crate::suggest::SuggestionEngine;
use crate::types::{SearchRequest, SearchResponse, SuggestionResponse, TrackResponse};

/// Orchestrates the three public operations: verify auth, consult the
/// cache, plan, fan out, cache the outcome. No retries at any step.
pub struct SearchService {
    verifier: Arc<dyn TokenVerifier>,
    cache: Arc<CacheStore>,
    aggregator: ResultAggregator,
    suggestions: SuggestionEngine,
}

impl SearchService {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        store: Arc<dyn DocumentStore>,
        cache: Arc<CacheStore>,
    ) -> Self {
        Self {
            verifier,
            cache,
            aggregator: ResultAggregator::new(store.clone()),
            suggestions: SuggestionEngine::new(store),
        }
    }

    pub async fn search(
        &self,
        token: Option<&str>,
        request: SearchRequest,
    ) -> Result<SearchResponse, ServiceError> {
        let result = self.run_search(token, &request).await;
        if let Err(e) = &result {
            warn!(
                operation = "search",
                code = e.code(),
                query = request.query_text().unwrap_or(""),
                error = %e,
                "search failed"
            );
        }
        result
    }

    async fn run_search(
        &self,
        token: Option<&str>,
        request: &SearchRequest,
    ) -> Result<SearchResponse, ServiceError> {
        let principal = self.verifier.verify(token).await?;

        // Reject before touching the cache: an invalid request can never
        // have populated it.
        if request.query_text().is_none() && !request.has_filters() {
            return Err(ServiceError::InvalidArgument(
                "search requires query text or at least one filter".to_string(),
            ));
        }

        info!(
            operation = "search",
            uid = %principal.uid,
            query = request.query_text().unwrap_or(""),
            limit = request.effective_limit(),
            "search request"
        );

        let key = CacheKey::for_request(request);
        if let Some(videos) = self.cache.get(&key) {
            return Ok(SearchResponse { videos });
        }

        let descriptors = QueryPlanner::plan(request)?;
        let videos = self
            .aggregator
            .collect(&descriptors, request.effective_limit())
            .await?;

        self.cache.put(key, videos.clone());
        info!(operation = "search", results = videos.len(), "search complete");
        Ok(SearchResponse { videos })
    }

    pub async fn suggestions(
        &self,
        token: Option<&str>,
        query: &str,
    ) -> Result<SuggestionResponse, ServiceError> {
        let principal = self.verifier.verify(token).await?;
        info!(operation = "suggestions", uid = %principal.uid, query, "suggestion request");

        match self.suggestions.suggest(query).await {
            Ok(suggestions) => Ok(SuggestionResponse { suggestions }),
            Err(e) => {
                warn!(operation = "suggestions", code = e.code(), error = %e, "suggestions failed");
                Err(e)
            }
        }
    }

    /// Fire-and-forget analytics: the structured log event is the whole
    /// side effect.
    pub async fn track_search(
        &self,
        token: Option<&str>,
        query: &str,
    ) -> Result<TrackResponse, ServiceError> {
        let principal = self.verifier.verify(token).await?;
        info!(operation = "track_search", uid = %principal.uid, query, "search tracked");
        Ok(TrackResponse { success: true })
    }
}
