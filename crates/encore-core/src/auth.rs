use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::ServiceError;

/// Identity extracted from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Principal {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
        }
    }
}

/// Credential verification seam. Every public service operation verifies
/// the inbound token before doing any other work.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: Option<&str>) -> Result<Principal, ServiceError>;
}

/// Fixed token table with constant-time comparison. With an empty table
/// auth is disabled and every caller resolves to an anonymous principal.
pub struct StaticTokenVerifier {
    tokens: Vec<(String, Principal)>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: Vec<(String, Principal)>) -> Self {
        Self { tokens }
    }

    /// No configured tokens: verification always succeeds.
    pub fn open() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: Option<&str>) -> Result<Principal, ServiceError> {
        if self.tokens.is_empty() {
            return Ok(Principal::new("anonymous"));
        }

        let token = token.ok_or_else(|| {
            ServiceError::Unauthenticated("missing bearer token".to_string())
        })?;

        // Scan the whole table so timing does not leak which token matched.
        let mut matched = None;
        for (expected, principal) in &self.tokens {
            if token.as_bytes().ct_eq(expected.as_bytes()).into() {
                matched = Some(principal.clone());
            }
        }

        matched.ok_or_else(|| ServiceError::Unauthenticated("invalid bearer token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> StaticTokenVerifier {
        StaticTokenVerifier::new(vec![(
            "secret-token".to_string(),
            Principal {
                uid: "user-1".to_string(),
                email: Some("user@example.com".to_string()),
            },
        )])
    }

    #[tokio::test]
    async fn test_valid_token_yields_principal() {
        let principal = verifier().verify(Some("secret-token")).await.unwrap();
        assert_eq!(principal.uid, "user-1");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let err = verifier().verify(None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_wrong_token_is_unauthenticated() {
        let err = verifier().verify(Some("nope")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_open_verifier_allows_anonymous() {
        let principal = StaticTokenVerifier::open().verify(None).await.unwrap();
        assert_eq!(principal.uid, "anonymous");
    }
}
