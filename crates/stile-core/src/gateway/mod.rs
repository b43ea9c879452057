//! Auth gateway contract: credential exchange and token persistence.
//!
//! The flow controller treats the gateway as an opaque async
//! capability; transport and storage live behind it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::now_millis_u64;

pub mod http;

pub use http::HttpGateway;

/// Session token issued by the authentication server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    /// Expiry timestamp in milliseconds since epoch.
    pub expires_at: u64,
}

impl SessionToken {
    /// Returns true once `expires_at` has passed.
    pub fn is_expired(&self) -> bool {
        now_millis_u64() >= self.expires_at
    }
}

/// Categories of gateway failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The server rejected the identifier/secret pair.
    InvalidCredentials,
    /// Transport-level failure (connect, timeout, bad response).
    Network,
}

/// Structured gateway error with kind and details.
#[derive(Debug, Clone)]
pub struct AuthError {
    /// Error category
    pub kind: AuthErrorKind,
    /// One-line summary suitable for logs
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates a credential-rejection error.
    pub fn invalid_credentials() -> Self {
        Self::new(AuthErrorKind::InvalidCredentials, "authentication rejected")
    }

    /// Creates a transport-level error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Network, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Fixed user-facing string for this error, rendered verbatim by UIs.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::InvalidCredentials => "Invalid username or password",
            AuthErrorKind::Network => "Network error occurred",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AuthError {}

/// Asynchronous credential exchange and token persistence.
// Consumed generically by the flow controller, so no Send bound is
// forced at the trait seam.
#[allow(async_fn_in_trait)]
pub trait AuthGateway {
    /// Exchanges the credential pair for a session token.
    async fn authenticate(&self, identifier: &str, secret: &str)
    -> Result<SessionToken, AuthError>;

    /// Returns a previously saved, non-expired token.
    async fn saved_token(&self) -> anyhow::Result<Option<SessionToken>>;

    /// Durably persists `token`. Idempotent.
    async fn save_token(&self, token: &SessionToken) -> anyhow::Result<()>;

    /// Durably removes any saved token. Safe to call when nothing is stored.
    async fn clear_saved_token(&self) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: token expiry check.
    #[test]
    fn test_token_expiry() {
        let now = now_millis_u64();

        let expired = SessionToken {
            token: "t".to_string(),
            expires_at: now - 1000,
        };
        assert!(expired.is_expired());

        let valid = SessionToken {
            token: "t".to_string(),
            expires_at: now + 60_000,
        };
        assert!(!valid.is_expired());
    }

    /// Test: user-facing messages are fixed per kind.
    #[test]
    fn test_user_messages() {
        assert_eq!(
            AuthError::invalid_credentials().user_message(),
            "Invalid username or password"
        );
        assert_eq!(
            AuthError::network("connection reset").user_message(),
            "Network error occurred"
        );
    }
}
