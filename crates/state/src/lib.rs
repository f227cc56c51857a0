//! Page state synchronization client for shelfsync
//!
//! Binds a page identifier to one remote state document and keeps a
//! local typed copy of it:
//!
//! - Load and save a whole page document in one round trip
//! - Pages nobody has saved yet load as the type's default value
//! - Saves to the same page are serialized, last write wins
//! - Optional deep-strip of `null` object fields before transmission
//!
//! The wire protocol is the state server's `/api/state/:page` pair, via
//! [`HttpStateStore`], but any [`StateStore`] implementation can back a
//! [`PageStateClient`].

mod clean;
mod page;
mod store;

pub use clean::{strip_null_fields, CleanPolicy};
pub use page::{PageState, PageStateClient};
pub use store::{HttpStateStore, MemoryStateStore, StateStore};

pub use shelfsync_models::{StateDocument, UserInfo};

use thiserror::Error;

/// Errors that can occur during page state operations
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error: {message} (Status: {status})")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, StateError>;
