pub mod aggregate;
pub mod auth;
pub mod cache;
pub mod error;
pub mod planner;
pub mod service;
pub mod store;
pub mod suggest;
pub mod types;

pub use aggregate::ResultAggregator;
pub use auth::{Principal, StaticTokenVerifier, TokenVerifier};
pub use cache::{CacheKey, CacheStore, Clock, ManualClock, SystemClock, CACHE_TTL, MAX_CAPACITY};
pub use error::ServiceError;
pub use planner::{QueryDescriptor, QueryPlanner, BATCH_SIZE};
pub use service::SearchService;
pub use store::{DocumentStore, MediaRecord, MemoryStore, Page};
pub use suggest::{SuggestionEngine, SUGGESTION_LIMIT};
pub use types::{
    SearchFilters, SearchRequest, SearchResponse, SearchResultItem, SuggestionItem,
    SuggestionKind, SuggestionResponse, Timestamp, TrackResponse, DEFAULT_LIMIT,
};

/// Initialize structured JSON logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
