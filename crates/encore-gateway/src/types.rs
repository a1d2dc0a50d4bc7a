use serde::{Deserialize, Serialize};

/// Suggestion request body
#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub query: String,
}

/// Search tracking request body
#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub query: String,
}

/// API error response carrying the taxonomy code
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
