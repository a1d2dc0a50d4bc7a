use std::sync::Arc;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use encore_core::{
    SearchRequest, SearchResponse, SearchService, ServiceError, SuggestionResponse, TrackResponse,
};

use crate::types::{ErrorResponse, HealthResponse, SuggestionsRequest, TrackRequest};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    pub allowed_origins: Vec<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Create the Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = if state.allowed_origins.is_empty() {
        // Permissive for development
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(
                state
                    .allowed_origins
                    .iter()
                    .map(|s| s.parse().unwrap())
                    .collect::<Vec<_>>(),
            )
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/search", post(search))
        .route("/api/v1/suggestions", post(suggestions))
        .route("/api/v1/search/track", post(track_search))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the gateway server
pub async fn start_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let router = create_router(state);
    let addr = format!("{}:{}", host, port);

    info!(addr = %addr, "Starting gateway server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");
    info!("Shutdown signal received, shutting down");
}

/// Bearer credential from the Authorization header, if any. Verification
/// itself happens inside the core service so that nothing runs before auth.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn error_response(e: ServiceError) -> ApiError {
    let status = match &e {
        ServiceError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        ServiceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ServiceError::FailedPrecondition(_) => StatusCode::PRECONDITION_FAILED,
        ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            code: e.code().to_string(),
        }),
    )
}

// --- REST Handlers ---

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    match state.service.search(bearer_token(&headers), req).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err(error_response(e)),
    }
}

async fn suggestions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    match state
        .service
        .suggestions(bearer_token(&headers), &req.query)
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err(error_response(e)),
    }
}

async fn track_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, ApiError> {
    match state
        .service
        .track_search(bearer_token(&headers), &req.query)
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err(error_response(e)),
    }
}
