//! Per-user book record store
//!
//! Records live at `users/{userId}/{collection}/{key}.json` on top of any
//! [`StorageProvider`]. Every operation is a single round trip to the backend;
//! nothing here spans more than one document.

use crate::error::{Result, StorageError};
use crate::storage::StorageProvider;
use crate::types::{BookKey, BookRecord, Collection, UserId};
use std::sync::Arc;

const RECORD_EXTENSION: &str = ".json";

/// Durable storage of book records, keyed by normalized catalog key
#[derive(Clone)]
pub struct RecordStore {
    storage: Arc<dyn StorageProvider>,
}

impl RecordStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    fn collection_path(user: &UserId, collection: Collection) -> String {
        format!("users/{}/{}", user, collection.storage_name())
    }

    fn record_path(user: &UserId, collection: Collection, key: &BookKey) -> String {
        format!(
            "{}/{}{}",
            Self::collection_path(user, collection),
            key,
            RECORD_EXTENSION
        )
    }

    /// Insert or fully replace a record
    pub async fn put(&self, user: &UserId, collection: Collection, record: &BookRecord) -> Result<()> {
        let path = Self::record_path(user, collection, &record.key);
        let data = serde_json::to_vec_pretty(record).map_err(|e| StorageError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!("put {}", path);
        self.storage.write(&path, data).await?;
        Ok(())
    }

    /// Fetch a record, `None` when the key is not in the collection
    pub async fn get(
        &self,
        user: &UserId,
        collection: Collection,
        key: &BookKey,
    ) -> Result<Option<BookRecord>> {
        let path = Self::record_path(user, collection, key);
        match self.storage.read(&path).await {
            Ok(data) => Ok(Some(decode(&path, &data)?)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a record; removing an absent record is not an error
    pub async fn delete(&self, user: &UserId, collection: Collection, key: &BookKey) -> Result<()> {
        let path = Self::record_path(user, collection, key);
        tracing::debug!("delete {}", path);
        match self.storage.delete(&path).await {
            Ok(()) | Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn contains(&self, user: &UserId, collection: Collection, key: &BookKey) -> Result<bool> {
        let path = Self::record_path(user, collection, key);
        Ok(self.storage.exists(&path).await?)
    }

    /// All records in a collection, in no particular order
    pub async fn list(&self, user: &UserId, collection: Collection) -> Result<Vec<BookRecord>> {
        let mut records = Vec::new();
        for name in self.document_names(user, collection).await? {
            let path = format!("{}/{}", Self::collection_path(user, collection), name);
            match self.storage.read(&path).await {
                Ok(data) => records.push(decode(&path, &data)?),
                // Deleted between listing and reading
                Err(StorageError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(records)
    }

    pub async fn count(&self, user: &UserId, collection: Collection) -> Result<usize> {
        Ok(self.document_names(user, collection).await?.len())
    }

    /// The record with the most recent `updatedAt`, records without one last
    pub async fn latest_updated(
        &self,
        user: &UserId,
        collection: Collection,
    ) -> Result<Option<BookRecord>> {
        let records = self.list(user, collection).await?;
        Ok(records.into_iter().max_by_key(|r| r.updated_at))
    }

    async fn document_names(&self, user: &UserId, collection: Collection) -> Result<Vec<String>> {
        let prefix = Self::collection_path(user, collection);
        let names = match self.storage.list(&prefix).await {
            Ok(names) => names,
            Err(StorageError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(names
            .into_iter()
            .filter(|name| name.ends_with(RECORD_EXTENSION) && !name.starts_with('.'))
            .collect())
    }
}

fn decode(path: &str, data: &[u8]) -> std::result::Result<BookRecord, StorageError> {
    serde_json::from_slice(data).map_err(|e| StorageError::Corrupt {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
