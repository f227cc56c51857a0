//! Typed page state handles.

use crate::clean::{strip_null_fields, CleanPolicy};
use crate::{Result, StateError, StateStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelfsync_models::UserInfo;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

/// Hands out [`PageState`] handles that share one backing store.
///
/// Handles created from the same client serialize their saves per page,
/// so two editors of the same page cannot interleave writes.
#[derive(Clone)]
pub struct PageStateClient {
    store: Arc<dyn StateStore>,
    clean_policy: CleanPolicy,
    save_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl PageStateClient {
    /// Create a client over `store` with the default [`CleanPolicy`].
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            clean_policy: CleanPolicy::default(),
            save_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Set how values are prepared before transmission.
    pub fn with_clean_policy(mut self, clean_policy: CleanPolicy) -> Self {
        self.clean_policy = clean_policy;
        self
    }

    /// A typed handle for one page, with writes attributed to `user`.
    ///
    /// Nothing is fetched until [`PageState::load`] is called.
    pub fn page<T>(&self, page: impl Into<String>, user: UserInfo) -> PageState<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        PageState::new(self.clone(), page.into(), user)
    }

    async fn save_lock(&self, page: &str) -> Arc<Mutex<()>> {
        let mut locks = self.save_locks.lock().await;
        locks.entry(page.to_string()).or_default().clone()
    }
}

/// One page's state, kept in sync with the backing store.
///
/// The handle follows the page lifecycle: construct, [`load`] once,
/// then [`save`] whole new values as the user edits. Between calls it
/// remembers the last known value, the most recent error message, and
/// whether a request is in flight.
///
/// [`load`]: Self::load
/// [`save`]: Self::save
pub struct PageState<T> {
    client: PageStateClient,
    page: String,
    user: UserInfo,
    value: Option<T>,
    error: Option<String>,
    loading_tx: watch::Sender<bool>,
    loading_rx: watch::Receiver<bool>,
}

impl<T> PageState<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn new(client: PageStateClient, page: String, user: UserInfo) -> Self {
        let (loading_tx, loading_rx) = watch::channel(false);
        Self {
            client,
            page,
            user,
            value: None,
            error: None,
            loading_tx,
            loading_rx,
        }
    }

    /// The page identifier this handle is bound to.
    pub fn page(&self) -> &str {
        &self.page
    }

    /// The last loaded or saved value, if any.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Message of the most recent failed operation, cleared when the
    /// next one starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a load or save is currently in flight.
    pub fn is_loading(&self) -> bool {
        *self.loading_rx.borrow()
    }

    /// Watch the in-flight flag, for callers that render progress.
    pub fn loading_changes(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    /// Fetch this page's state from the store.
    ///
    /// A page nobody has saved yet loads as `T::default()`. On failure
    /// the error message is recorded and the value is cleared.
    pub async fn load(&mut self) -> Result<&T> {
        self.begin();
        let outcome = self.client.store.load(&self.page).await;
        self.finish();

        let result = match outcome {
            Ok(Some(state)) => serde_json::from_value(state).map_err(StateError::from),
            Ok(None) => Ok(T::default()),
            Err(err) => Err(err),
        };

        match result {
            Ok(value) => {
                debug!(page = %self.page, "loaded page state");
                Ok(self.value.insert(value))
            }
            Err(err) => {
                warn!(page = %self.page, error = %err, "failed to load page state");
                self.value = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Persist `value` as this page's new state, attributed to this
    /// handle's user.
    ///
    /// A save waits for any in-flight save to the same page to settle
    /// instead of racing it. On success the handle keeps `value`; on
    /// failure the previous value stays and the error is recorded.
    pub async fn save(&mut self, value: T) -> Result<()> {
        let lock = self.client.save_lock(&self.page).await;
        let _in_flight = lock.lock().await;

        self.begin();
        let result = self.push(&value).await;
        self.finish();

        match result {
            Ok(()) => {
                debug!(page = %self.page, "saved page state");
                self.value = Some(value);
                Ok(())
            }
            Err(err) => {
                warn!(page = %self.page, error = %err, "failed to save page state");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn push(&self, value: &T) -> Result<()> {
        let mut state = serde_json::to_value(value)?;
        if self.client.clean_policy == CleanPolicy::StripNulls {
            state = strip_null_fields(state);
        }
        self.client.store.save(&self.page, state, &self.user).await
    }

    fn begin(&mut self) {
        self.error = None;
        let _ = self.loading_tx.send(true);
    }

    fn finish(&mut self) {
        let _ = self.loading_tx.send(false);
    }
}
