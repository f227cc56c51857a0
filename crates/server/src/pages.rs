//! Per-page state documents on disk, committed to git.

use crate::git::GitLog;
use crate::{Result, ServerError};
use serde_json::Value;
use shelfsync_models::{StateDocument, UserInfo};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Check that a page identifier is safe to use as a file name.
///
/// Identifiers become file names and git paths, so only ASCII letters,
/// digits, `-` and `_` are allowed.
pub fn validate_page_id(page: &str) -> Result<()> {
    let valid = !page.is_empty()
        && page
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ServerError::InvalidPageId(page.to_string()))
    }
}

/// Stores one [`StateDocument`] per page as a pretty-printed JSON file
/// and records every save as a git commit.
///
/// Saves are serialized through one lock: the git index is shared
/// across pages, so two commits must never run at once.
pub struct PageStore {
    state_dir: PathBuf,
    git: Option<GitLog>,
    save_lock: Mutex<()>,
}

impl PageStore {
    /// Create a store over `state_dir`. With `git` set to `None` saves
    /// skip the commit step entirely.
    pub fn new(state_dir: PathBuf, git: Option<GitLog>) -> Self {
        Self {
            state_dir,
            git,
            save_lock: Mutex::new(()),
        }
    }

    fn page_path(&self, page: &str) -> PathBuf {
        self.state_dir.join(format!("{}.json", page))
    }

    /// Load the stored document for `page`, or `None` if the page has
    /// never been saved.
    pub async fn load(&self, page: &str) -> Result<Option<StateDocument<Value>>> {
        validate_page_id(page)?;
        let content = match fs::read_to_string(self.page_path(page)).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Persist `state` for `page`, attributed to `user`, and record the
    /// change as a commit.
    ///
    /// Write and commit succeed or fail together: when the commit is
    /// rejected the file is restored to its previous content, so the
    /// working tree never drifts from the log.
    pub async fn save(
        &self,
        page: &str,
        state: Value,
        user: &UserInfo,
    ) -> Result<StateDocument<Value>> {
        validate_page_id(page)?;
        let _guard = self.save_lock.lock().await;

        let path = self.page_path(page);
        let previous = match fs::read_to_string(&path).await {
            Ok(content) => Some(content),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };

        let document = StateDocument::new(state, user.clone());
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(&path, json).await?;

        if let Some(git) = &self.git {
            if let Err(err) = git.commit_state_change(&path, page, user).await {
                rollback(&path, previous).await;
                return Err(err);
            }
        }

        debug!(page, "saved page state");
        Ok(document)
    }
}

/// Restore `path` to its pre-save content after a failed commit.
async fn rollback(path: &Path, previous: Option<String>) {
    let result = match previous {
        Some(content) => fs::write(path, content).await,
        None => fs::remove_file(path).await,
    };
    if let Err(err) = result {
        warn!(path = %path.display(), error = %err, "rollback after failed commit also failed");
    }
}
