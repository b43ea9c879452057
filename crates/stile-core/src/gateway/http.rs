//! HTTP implementation of the auth gateway.
//!
//! Speaks JSON to `POST {base}/v1/login`; token persistence is
//! delegated to the session store.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::gateway::{AuthError, AuthGateway, SessionToken};
use crate::session::SessionStore;

/// Production gateway over a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    store: SessionStore,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    expires_at: u64,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration, store: SessionStore) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
        })
    }
}

impl AuthGateway for HttpGateway {
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<SessionToken, AuthError> {
        let url = format!("{}/v1/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "identifier": identifier,
                "secret": secret,
            }))
            .send()
            .await
            .map_err(|e| AuthError::network(format!("Failed to send login request: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AuthError::invalid_credentials());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = AuthError::network(format!("HTTP {status}"));
            return Err(if body.is_empty() {
                error
            } else {
                error.with_details(body)
            });
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::network(format!("Failed to parse login response: {e}")))?;

        Ok(SessionToken {
            token: login.token,
            expires_at: login.expires_at,
        })
    }

    async fn saved_token(&self) -> Result<Option<SessionToken>> {
        self.store.load_valid()
    }

    async fn save_token(&self, token: &SessionToken) -> Result<()> {
        self.store.save(token)
    }

    async fn clear_saved_token(&self) -> Result<()> {
        self.store.clear()
    }
}
