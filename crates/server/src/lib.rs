//! Local file state server for shelfsync
//!
//! Serves the book catalog, the collection-needs wishlist, and per-page
//! state documents over HTTP:
//!
//! - `/api/books` and `/api/needs`: CRUD over pretty-printed JSON files
//! - `/api/state/:page`: whole-document load/save per page, with every
//!   save recorded as a local git commit attributed to the acting user
//!
//! Everything lives on the local filesystem; the server never talks to
//! a database or a remote.

pub mod api;
pub mod collections;
pub mod config;
pub mod error;
pub mod git;
pub mod pages;
pub mod state_api;

pub use config::ServerConfig;
pub use error::ServerError;

pub type Result<T> = std::result::Result<T, ServerError>;

use axum::http::{header, Method};
use axum::routing::{get, put};
use axum::{Extension, Router};
use collections::CollectionStore;
use git::GitLog;
use pages::PageStore;
use shelfsync_models::{Book, CollectionNeed};
use std::sync::Arc;
use tokio::fs;
use tower_http::cors::{Any, CorsLayer};

/// Everything the handlers need, created once at startup.
pub struct ServerContext {
    pub books: CollectionStore<Book>,
    pub needs: CollectionStore<CollectionNeed>,
    pub pages: PageStore,
}

impl ServerContext {
    /// Build a context from configuration, creating the data and state
    /// directories if they are missing.
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir).await?;
        fs::create_dir_all(&config.state_dir).await?;

        let git = config
            .git_commits
            .then(|| GitLog::new(config.repo_dir.clone()));

        Ok(Self {
            books: CollectionStore::new(config.books_path()),
            needs: CollectionStore::new(config.needs_path()),
            pages: PageStore::new(config.state_dir.clone(), git),
        })
    }
}

/// Assemble the application router.
///
/// The API is consumed by browsers on other origins, so CORS allows any
/// origin, the four verbs the API uses, and JSON bodies.
pub fn router(context: Arc<ServerContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/books", get(api::list_books).post(api::create_book))
        .route(
            "/api/books/:id",
            put(api::update_book).delete(api::delete_book),
        )
        .route("/api/needs", get(api::list_needs).post(api::create_need))
        .route(
            "/api/needs/:id",
            put(api::update_need).delete(api::delete_need),
        )
        .route(
            "/api/state/:page",
            get(state_api::load_state).post(state_api::save_state),
        )
        .layer(Extension(context))
        .layer(cors)
}
