//! Storage backends for page state documents.

use crate::{Result, StateError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shelfsync_models::{ErrorResponse, SaveStateRequest, StateDocument, UserInfo};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Remote document storage keyed by page identifier.
///
/// `load` distinguishes "never written" (`None`) from stored content so
/// callers can apply their own default.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetch the stored state for `page`, or `None` if nothing has been
    /// saved under that identifier yet.
    async fn load(&self, page: &str) -> Result<Option<Value>>;

    /// Overwrite the stored state for `page`, attributed to `user`.
    async fn save(&self, page: &str, state: Value, user: &UserInfo) -> Result<()>;
}

/// Store backed by the state server's `/api/state/:page` endpoints.
pub struct HttpStateStore {
    base_url: String,
    http_client: Client,
}

impl HttpStateStore {
    /// Create a store talking to the server at `base_url`.
    pub fn new(base_url: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn endpoint(&self, page: &str) -> String {
        format!("{}/api/state/{}", self.base_url, page)
    }

    async fn api_error(response: reqwest::Response) -> StateError {
        let status = response.status();
        let message = match response.text().await {
            // The server wraps failures as {"error": "..."}; fall back to
            // the raw body for anything else.
            Ok(body) => match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => parsed.error,
                Err(_) => body,
            },
            Err(err) => err.to_string(),
        };
        StateError::Api { status, message }
    }
}

#[async_trait]
impl StateStore for HttpStateStore {
    async fn load(&self, page: &str) -> Result<Option<Value>> {
        let response = self.http_client.get(self.endpoint(page)).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let state: Value = response.json().await?;
        // The server reports a never-written page as an empty object.
        if state.as_object().is_some_and(|fields| fields.is_empty()) {
            return Ok(None);
        }
        Ok(Some(state))
    }

    async fn save(&self, page: &str, state: Value, user: &UserInfo) -> Result<()> {
        let body = SaveStateRequest {
            state,
            user: user.clone(),
        };
        let response = self
            .http_client
            .post(self.endpoint(page))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }
}

/// In-memory store for tests and tooling.
///
/// Keeps full [`StateDocument`] wrappers so attribution and timestamps
/// can be asserted.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    pages: Arc<RwLock<HashMap<String, StateDocument<Value>>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full stored document for `page`, including attribution.
    pub async fn document(&self, page: &str) -> Option<StateDocument<Value>> {
        self.pages.read().await.get(page).cloned()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, page: &str) -> Result<Option<Value>> {
        let pages = self.pages.read().await;
        Ok(pages.get(page).map(|doc| doc.state.clone()))
    }

    async fn save(&self, page: &str, state: Value, user: &UserInfo) -> Result<()> {
        let mut pages = self.pages.write().await;
        pages.insert(page.to_string(), StateDocument::new(state, user.clone()));
        Ok(())
    }
}
