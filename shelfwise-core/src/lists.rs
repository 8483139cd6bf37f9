//! Moving books between a user's reading lists
//!
//! Every transition here is a sequence of independent store round trips.
//! Moves write the destination before deleting the source: a failure in
//! between leaves the book in both lists, never in neither, and repeating
//! the operation converges.

use crate::error::{Result, ShelfError};
use crate::events::{EventBus, ListEvent};
use crate::progress::{ProgressTracker, ProgressUpdate};
use crate::session::SessionProvider;
use crate::store::RecordStore;
use crate::types::{BookKey, BookRecord, BookSource, Collection, ReadingStats, UserId};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// What a completion check did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Reconciliation {
    /// Nothing is being read
    Idle,

    /// The most recently updated book is not finished yet
    InProgress { key: BookKey },

    /// The book left currently-reading; `shelved` is false when the
    /// bookshelf already had it
    Completed { key: BookKey, shelved: bool },
}

/// The mutation surface over one user's reading lists
#[derive(Clone)]
pub struct ReadingLists {
    store: RecordStore,
    session: Arc<dyn SessionProvider>,
    events: EventBus,
    tracker: ProgressTracker,
}

impl ReadingLists {
    pub fn new(store: RecordStore, session: Arc<dyn SessionProvider>, events: EventBus) -> Self {
        let tracker = ProgressTracker::new(store.clone(), Arc::clone(&session));
        Self {
            store,
            session,
            events,
            tracker,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.tracker
    }

    fn user(&self) -> Result<UserId> {
        self.session.require_user()
    }

    fn notify(&self, user: UserId) {
        self.events.emit(ListEvent::BooksUpdated { user });
    }

    /// Save a catalog book to the to-read list
    pub async fn add_to_read_list(&self, book: &BookSource) -> Result<BookRecord> {
        let user = self.user()?;
        let record = BookRecord::from_source(book, Utc::now());
        self.store
            .put(&user, Collection::ToRead, &record)
            .await
            .inspect_err(|e| tracing::error!("Failed to add {} to read list: {}", record.key, e))?;

        tracing::info!("Added {} to the read list", record.key);
        self.notify(user);
        Ok(record)
    }

    /// Start reading a book: write it to currently-reading, then drop it
    /// from to-read
    pub async fn start_reading(&self, book: &BookSource) -> Result<BookRecord> {
        let user = self.user()?;
        let now = Utc::now();
        let record = BookRecord::from_source(book, now).start_reading(now);

        self.store
            .put(&user, Collection::CurrentlyReading, &record)
            .await
            .inspect_err(|e| tracing::error!("Failed to start reading {}: {}", record.key, e))?;
        self.store
            .delete(&user, Collection::ToRead, &record.key)
            .await
            .inspect_err(|e| {
                tracing::error!("{} is now being read but is still on the read list: {}", record.key, e)
            })?;

        tracing::info!("Started reading {}", record.key);
        self.notify(user);
        Ok(record)
    }

    /// Start reading a book that is already on the to-read list
    pub async fn promote(&self, book_id: &str) -> Result<BookRecord> {
        let user = self.user()?;
        let key = BookKey::parse(book_id)?;
        let queued = self
            .store
            .get(&user, Collection::ToRead, &key)
            .await?
            .ok_or_else(|| ShelfError::NotFound(format!("{} is not on the read list", key)))?;

        self.start_reading(&BookSource::from(&queued)).await
    }

    /// Put a book on the bookshelf
    pub async fn add_to_bookshelf(&self, book: &BookSource) -> Result<BookRecord> {
        let user = self.user()?;
        let record = BookRecord::from_source(book, Utc::now());
        self.store
            .put(&user, Collection::Bookshelf, &record)
            .await
            .inspect_err(|e| tracing::error!("Failed to add {} to bookshelf: {}", record.key, e))?;

        tracing::info!("Added {} to the bookshelf", record.key);
        self.notify(user);
        Ok(record)
    }

    /// Remove a book from one list; absent books are ignored
    pub async fn remove(&self, collection: Collection, book_id: &str) -> Result<()> {
        let user = self.user()?;
        let key = BookKey::parse(book_id)?;
        self.store
            .delete(&user, collection, &key)
            .await
            .inspect_err(|e| tracing::error!("Failed to remove {} from {}: {}", key, collection, e))?;

        tracing::info!("Removed {} from {}", key, collection);
        self.notify(user);
        Ok(())
    }

    /// Record page progress for a currently-reading book.
    ///
    /// Does not check for completion; see [`ReadingLists::reconcile_completion`].
    pub async fn update_progress(&self, book_id: &str, update: ProgressUpdate) -> Result<BookRecord> {
        self.tracker.update(book_id, update).await
    }

    /// The most recently updated currently-reading book. Read-only.
    pub async fn latest_updated(&self) -> Result<Option<BookRecord>> {
        let user = self.user()?;
        self.store
            .latest_updated(&user, Collection::CurrentlyReading)
            .await
    }

    /// Move the most recently updated book to the bookshelf if it is finished.
    ///
    /// Idempotent: running it again after a completion looks at the next book
    /// (or nothing), and a book already on the shelf is not written twice.
    pub async fn reconcile_completion(&self) -> Result<Reconciliation> {
        let user = self.user()?;
        let Some(latest) = self
            .store
            .latest_updated(&user, Collection::CurrentlyReading)
            .await?
        else {
            return Ok(Reconciliation::Idle);
        };

        if !latest.is_complete() {
            return Ok(Reconciliation::InProgress { key: latest.key });
        }

        let already_shelved = self
            .store
            .contains(&user, Collection::Bookshelf, &latest.key)
            .await?;
        if !already_shelved {
            let shelved = BookRecord::from_source(&BookSource::from(&latest), Utc::now());
            self.store.put(&user, Collection::Bookshelf, &shelved).await?;
        }
        self.store
            .delete(&user, Collection::CurrentlyReading, &latest.key)
            .await?;

        tracing::info!("Finished {}", latest.key);
        self.notify(user);
        Ok(Reconciliation::Completed {
            key: latest.key,
            shelved: !already_shelved,
        })
    }

    /// Completion check for implicit triggers: failures are logged, not
    /// returned, and the book stays where it is for the next attempt
    pub async fn reconcile_quietly(&self) -> Option<Reconciliation> {
        match self.reconcile_completion().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!("Completion check failed, will retry on next load: {}", e);
                None
            }
        }
    }

    /// A collection sorted for display: newest first by `updatedAt` for
    /// current books, by `addedAt` otherwise
    pub async fn list(&self, collection: Collection) -> Result<Vec<BookRecord>> {
        let user = self.user()?;
        let mut records = self.store.list(&user, collection).await?;
        match collection {
            Collection::CurrentlyReading => {
                records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at))
            }
            Collection::ToRead | Collection::Bookshelf => {
                records.sort_by(|a, b| b.added_at.cmp(&a.added_at))
            }
        }
        Ok(records)
    }

    pub async fn get(&self, collection: Collection, book_id: &str) -> Result<Option<BookRecord>> {
        let user = self.user()?;
        let key = BookKey::parse(book_id)?;
        self.store.get(&user, collection, &key).await
    }

    /// How many books are in each list
    pub async fn stats(&self) -> Result<ReadingStats> {
        let user = self.user()?;
        Ok(ReadingStats {
            to_read: self.store.count(&user, Collection::ToRead).await?,
            currently_reading: self.store.count(&user, Collection::CurrentlyReading).await?,
            finished: self.store.count(&user, Collection::Bookshelf).await?,
        })
    }
}
