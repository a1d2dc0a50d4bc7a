use thiserror::Error;

/// Closed error taxonomy for the service. Produced once at the boundary;
/// downstream code matches on variants instead of inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable wire code for logging and the HTTP surface.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Unauthenticated(_) => "unauthenticated",
            ServiceError::PermissionDenied(_) => "permission-denied",
            ServiceError::NotFound(_) => "not-found",
            ServiceError::InvalidArgument(_) => "invalid-argument",
            ServiceError::FailedPrecondition(_) => "failed-precondition",
            ServiceError::Unavailable(_) => "unavailable",
            ServiceError::Internal(_) => "internal",
        }
    }

    /// Classify an upstream failure message by substring against known
    /// backend code spellings. Anything unrecognized is Internal.
    pub fn classify(message: &str) -> ServiceError {
        let normalized = message.to_lowercase().replace('_', "-");
        let msg = message.to_string();

        if normalized.contains("unauthenticated") {
            ServiceError::Unauthenticated(msg)
        } else if normalized.contains("permission-denied") {
            ServiceError::PermissionDenied(msg)
        } else if normalized.contains("not-found") {
            ServiceError::NotFound(msg)
        } else if normalized.contains("invalid-argument") {
            ServiceError::InvalidArgument(msg)
        } else if normalized.contains("failed-precondition") {
            ServiceError::FailedPrecondition(msg)
        } else if normalized.contains("unavailable") {
            ServiceError::Unavailable(msg)
        } else {
            ServiceError::Internal(msg)
        }
    }
}
