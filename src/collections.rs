//! REST clients for the catalog's book and need collections.

use crate::error::{Error, Result};
use reqwest::Client;
use shelfsync_models::{
    Book, BookDraft, BookPatch, CollectionNeed, ErrorResponse, NeedDraft, NeedPatch,
};
use url::Url;

/// Client for the `/api/books` collection
pub struct BooksClient {
    base_url: String,
    http_client: Client,
}

impl BooksClient {
    pub fn new(base_url: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn endpoint(&self, id: Option<&str>) -> Result<Url> {
        let raw = match id {
            Some(id) => format!("{}/api/books/{}", self.base_url, id),
            None => format!("{}/api/books", self.base_url),
        };
        Ok(Url::parse(&raw)?)
    }

    /// Fetch every book in the catalog
    pub async fn list(&self) -> Result<Vec<Book>> {
        let response = self.http_client.get(self.endpoint(None)?).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Register a new book; the server assigns its id and timestamp
    pub async fn create(&self, draft: &BookDraft) -> Result<Book> {
        let response = self
            .http_client
            .post(self.endpoint(None)?)
            .json(draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Apply `patch` to the book with `id` and return the updated record
    pub async fn update(&self, id: &str, patch: &BookPatch) -> Result<Book> {
        let response = self
            .http_client
            .put(self.endpoint(Some(id))?)
            .json(patch)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Remove the book with `id`; removing an unknown id is not an error
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.endpoint(Some(id))?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}

/// Client for the `/api/needs` collection
pub struct NeedsClient {
    base_url: String,
    http_client: Client,
}

impl NeedsClient {
    pub fn new(base_url: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn endpoint(&self, id: Option<&str>) -> Result<Url> {
        let raw = match id {
            Some(id) => format!("{}/api/needs/{}", self.base_url, id),
            None => format!("{}/api/needs", self.base_url),
        };
        Ok(Url::parse(&raw)?)
    }

    /// Fetch the full wish list
    pub async fn list(&self) -> Result<Vec<CollectionNeed>> {
        let response = self.http_client.get(self.endpoint(None)?).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Add a title the library is looking for
    pub async fn create(&self, draft: &NeedDraft) -> Result<CollectionNeed> {
        let response = self
            .http_client
            .post(self.endpoint(None)?)
            .json(draft)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Apply `patch` to the need with `id` and return the updated record
    pub async fn update(&self, id: &str, patch: &NeedPatch) -> Result<CollectionNeed> {
        let response = self
            .http_client
            .put(self.endpoint(Some(id))?)
            .json(patch)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Remove the need with `id`; removing an unknown id is not an error
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.endpoint(Some(id))?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}

async fn api_error(response: reqwest::Response) -> Error {
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
    Error::Api { status, message }
}
