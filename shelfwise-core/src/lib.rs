//! Shelfwise Core Library
//!
//! Per-user reading lists: a to-read queue, the books currently being read
//! with page progress, and a bookshelf of finished books. Every list change
//! goes through [`ReadingLists`], which persists records through a
//! [`StorageProvider`] and announces changes on an [`EventBus`].

pub mod catalog;
pub mod error;
pub mod events;
pub mod lists;
pub mod progress;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;

pub use error::{CatalogError, ParseError, Result, ShelfError, StorageError};
pub use events::{EventBus, EventName, ListEvent, Subscription};
pub use lists::{ReadingLists, Reconciliation};
pub use progress::{ProgressTracker, ProgressUpdate};
pub use session::{SessionProvider, SharedSession, StaticSession};
pub use storage::{LocalStorage, MemoryStorage, StorageProvider};
pub use store::RecordStore;
pub use types::{Author, BookKey, BookRecord, BookSource, Collection, ReadingStats, UserId};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reading_lists_wiring() {
        let user = UserId::parse("reader-1").unwrap();
        let lists = ReadingLists::new(
            RecordStore::new(Arc::new(MemoryStorage::new())),
            Arc::new(StaticSession::signed_in(user)),
            EventBus::new(),
        );

        let book = BookSource::new(BookKey::parse("/works/OL1W").unwrap(), "Dune");
        lists.add_to_read_list(&book).await.unwrap();
        assert_eq!(lists.stats().await.unwrap().to_read, 1);
    }
}
