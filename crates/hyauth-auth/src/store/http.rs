//! HTTP account store.
//!
//! Fetches the users document from a panel API instead of the local file.
//! The response body must be the same `{"name": {record}, ...}` JSON object
//! the file store reads.
//!
//! # Example
//!
//! ```no_run
//! use hyauth_auth::HttpStore;
//!
//! let store = HttpStore::new("http://127.0.0.1:8080/api/v1/users", Some("panel-token".into()));
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::AuthError;
use crate::snapshot::Snapshot;

use super::AccountStore;

/// Account store that delegates to a remote panel over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpStore {
    /// Create a new HTTP store.
    ///
    /// `token` is sent as a Bearer token when present.
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(Client::new(), url, token)
    }

    /// Create with a request timeout applied to every load.
    pub fn with_timeout(
        url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AuthError::backend)?;
        Ok(Self::with_client(client, url, token))
    }

    /// Create with a custom reqwest [`Client`] (for proxies, TLS roots, etc.).
    pub fn with_client(client: Client, url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            token,
        }
    }
}

#[async_trait]
impl AccountStore for HttpStore {
    async fn load_all(&self) -> Result<Snapshot, AuthError> {
        let mut req = self.client.get(&self.url);
        if let Some(ref token) = self.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        let resp = req.send().await.map_err(AuthError::backend)?;

        if !resp.status().is_success() {
            return Err(AuthError::Backend(format!(
                "HTTP {}",
                resp.status().as_u16()
            )));
        }

        // Decode from the full body so a truncated response is rejected as a whole.
        let body = resp.bytes().await.map_err(AuthError::backend)?;
        Snapshot::from_json_slice(&body)
    }

    fn describe(&self) -> String {
        format!("http:{}", self.url)
    }
}
