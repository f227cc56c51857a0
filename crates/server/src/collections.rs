//! JSON-file-backed collections.

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

/// One collection persisted as a pretty-printed JSON array on disk.
///
/// A missing file reads as the empty collection; a corrupt file is an
/// error rather than silent data loss. Mutations hold a write lock for
/// the whole read-modify-write cycle so concurrent requests cannot
/// interleave and drop each other's changes.
pub struct CollectionStore<T> {
    path: PathBuf,
    lock: RwLock<()>,
    _marker: PhantomData<T>,
}

impl<T> CollectionStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: RwLock::new(()),
            _marker: PhantomData,
        }
    }

    /// All items, oldest first.
    pub async fn list(&self) -> Result<Vec<T>> {
        let _guard = self.lock.read().await;
        self.read().await
    }

    /// Append `item` to the collection.
    pub async fn append(&self, item: T) -> Result<()> {
        let _guard = self.lock.write().await;
        let mut items = self.read().await?;
        items.push(item);
        self.write(&items).await
    }

    /// Update the first item `matches` selects, returning the updated
    /// item, or `None` when nothing matched.
    pub async fn update<F, M>(&self, matches: F, mutate: M) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
        M: FnOnce(&mut T),
    {
        let _guard = self.lock.write().await;
        let mut items = self.read().await?;
        let Some(item) = items.iter_mut().find(|item| matches(item)) else {
            return Ok(None);
        };
        mutate(item);
        let updated = item.clone();
        self.write(&items).await?;
        Ok(Some(updated))
    }

    /// Remove every item `matches` selects. Removing an id that does
    /// not exist is not an error.
    pub async fn remove<F>(&self, matches: F) -> Result<()>
    where
        F: Fn(&T) -> bool,
    {
        let _guard = self.lock.write().await;
        let mut items = self.read().await?;
        items.retain(|item| !matches(item));
        self.write(&items).await
    }

    async fn read(&self) -> Result<Vec<T>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, items: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}
