//! Shelfsync Rust Client Library
//!
//! A Rust client for the shelfsync catalog server, providing access to the
//! shared book catalog, the collection wish list, and the git-backed page
//! state store.

pub mod collections;
pub mod config;
pub mod error;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::collections::{BooksClient, NeedsClient};
use crate::config::ClientOptions;
use shelfsync_state::{HttpStateStore, PageState, PageStateClient};

pub use crate::error::{Error, Result};
pub use shelfsync_models::{
    Book, BookDraft, BookPatch, CollectionNeed, DonationDraft, DonationRequest, DonationStatus,
    NeedDraft, NeedPatch, Priority, StateDocument, UserInfo,
};
pub use shelfsync_state::{CleanPolicy, StateError};

/// The main entry point for the shelfsync client
pub struct Shelfsync {
    /// The base URL of the catalog server
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// State synchronizer shared by every page handle
    state: PageStateClient,
    /// Client options
    pub options: ClientOptions,
}

impl Shelfsync {
    /// Create a new shelfsync client
    ///
    /// # Arguments
    ///
    /// * `server_url` - The base URL of the catalog server
    ///
    /// # Example
    ///
    /// ```
    /// use shelfsync::Shelfsync;
    ///
    /// let client = Shelfsync::new("http://localhost:3001");
    /// ```
    pub fn new(server_url: &str) -> Self {
        Self::new_with_options(server_url, ClientOptions::default())
    }

    /// Create a new shelfsync client with custom options
    ///
    /// # Arguments
    ///
    /// * `server_url` - The base URL of the catalog server
    /// * `options` - Custom client options
    ///
    /// # Example
    ///
    /// ```
    /// use shelfsync::{CleanPolicy, Shelfsync};
    /// use shelfsync::config::ClientOptions;
    ///
    /// let options = ClientOptions::default().with_clean_policy(CleanPolicy::StripNulls);
    /// let client = Shelfsync::new_with_options("http://localhost:3001", options);
    /// ```
    pub fn new_with_options(server_url: &str, options: ClientOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let store = HttpStateStore::new(server_url, http_client.clone());
        let state = PageStateClient::new(Arc::new(store)).with_clean_policy(options.clean_policy);

        Self {
            url: server_url.trim_end_matches('/').to_string(),
            http_client,
            state,
            options,
        }
    }

    /// Create a client for the book catalog
    ///
    /// # Example
    ///
    /// ```
    /// use shelfsync::Shelfsync;
    ///
    /// let client = Shelfsync::new("http://localhost:3001");
    /// let books = client.books();
    /// ```
    pub fn books(&self) -> BooksClient {
        BooksClient::new(&self.url, self.http_client.clone())
    }

    /// Create a client for the collection wish list
    pub fn needs(&self) -> NeedsClient {
        NeedsClient::new(&self.url, self.http_client.clone())
    }

    /// Get a reference to the page state synchronizer
    ///
    /// Handles created through the same synchronizer serialize their
    /// saves per page.
    pub fn state(&self) -> &PageStateClient {
        &self.state
    }

    /// Create a typed handle for one page, with writes attributed to `user`
    ///
    /// # Example
    ///
    /// ```
    /// use shelfsync::{Book, Shelfsync, UserInfo};
    ///
    /// let client = Shelfsync::new("http://localhost:3001");
    /// let user = UserInfo::new("ketab", "ketab@example.com");
    /// let books = client.page::<Vec<Book>>("books", user);
    /// ```
    pub fn page<T>(&self, page: &str, user: UserInfo) -> PageState<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.state.page(page, user)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::Shelfsync;
    pub use shelfsync_models::UserInfo;
}
