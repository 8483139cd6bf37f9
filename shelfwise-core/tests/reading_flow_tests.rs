//! Reading flow tests for shelfwise-core
//!
//! These tests drive [`ReadingLists`] against an on-disk store and check the
//! documents it leaves behind.
//!
//! ## Test Strategy
//!
//! 1. **Flow tests**: the to-read → reading → bookshelf path with the
//!    notifications it produces
//! 2. **Recovery tests**: a store that fails mid-flow, then comes back
//! 3. **Layout tests**: document paths and field names on disk

use shelfwise_core::{
    BookKey, BookSource, Collection, EventBus, EventName, LocalStorage, MemoryStorage, ProgressUpdate,
    ReadingLists, Reconciliation, RecordStore, ShelfError, SharedSession, StaticSession, UserId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

fn reader() -> UserId {
    UserId::parse("reader-1").unwrap()
}

fn dune() -> BookSource {
    BookSource::new(BookKey::parse("/works/OL893415W").unwrap(), "Dune").with_pages(412)
}

fn local_lists(dir: &TempDir) -> ReadingLists {
    ReadingLists::new(
        RecordStore::new(Arc::new(LocalStorage::new(dir.path()))),
        Arc::new(StaticSession::signed_in(reader())),
        EventBus::new(),
    )
}

fn count_events(bus: &EventBus) -> (Arc<AtomicUsize>, shelfwise_core::Subscription) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let sub = bus.subscribe(EventName::BooksUpdated, move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (count, sub)
}

// =============================================================================
// Flow Tests
// =============================================================================

#[tokio::test]
async fn test_dune_from_currently_reading_to_bookshelf() {
    let dir = TempDir::new().unwrap();
    let lists = local_lists(&dir);
    lists.start_reading(&dune()).await.unwrap();

    let (count, _sub) = count_events(lists.events());

    lists
        .update_progress("OL893415W", ProgressUpdate::new(412, None))
        .await
        .unwrap();
    let outcome = lists.reconcile_completion().await.unwrap();

    assert_eq!(
        outcome,
        Reconciliation::Completed {
            key: BookKey::parse("OL893415W").unwrap(),
            shelved: true,
        }
    );
    assert!(lists.list(Collection::CurrentlyReading).await.unwrap().is_empty());

    let shelf = lists.list(Collection::Bookshelf).await.unwrap();
    assert_eq!(shelf.len(), 1);
    assert_eq!(shelf[0].title, "Dune");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_queue_then_start_then_finish() {
    let dir = TempDir::new().unwrap();
    let lists = local_lists(&dir);
    let (count, _sub) = count_events(lists.events());

    lists.add_to_read_list(&dune()).await.unwrap();
    lists.promote("/works/OL893415W").await.unwrap();
    lists.progress().submit("OL893415W", "100", "").await.unwrap();

    assert!(matches!(
        lists.reconcile_completion().await.unwrap(),
        Reconciliation::InProgress { .. }
    ));

    lists.progress().submit("OL893415W", "420", "").await.unwrap();
    assert!(matches!(
        lists.reconcile_completion().await.unwrap(),
        Reconciliation::Completed { shelved: true, .. }
    ));
    assert_eq!(lists.reconcile_completion().await.unwrap(), Reconciliation::Idle);

    let stats = lists.stats().await.unwrap();
    assert_eq!((stats.to_read, stats.currently_reading, stats.finished), (0, 0, 1));

    // add, promote, complete
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_sign_out_blocks_mutations() {
    let session = SharedSession::new();
    let lists = ReadingLists::new(
        RecordStore::new(Arc::new(MemoryStorage::new())),
        Arc::new(session.clone()),
        EventBus::new(),
    );

    session.sign_in(reader());
    lists.add_to_read_list(&dune()).await.unwrap();

    session.sign_out();
    let err = lists.add_to_bookshelf(&dune()).await.unwrap_err();
    assert!(matches!(err, ShelfError::NotAuthenticated));
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[tokio::test]
async fn test_offline_reconcile_keeps_book_for_retry() {
    let storage = Arc::new(MemoryStorage::new());
    let lists = ReadingLists::new(
        RecordStore::new(storage.clone()),
        Arc::new(StaticSession::signed_in(reader())),
        EventBus::new(),
    );
    lists.start_reading(&dune()).await.unwrap();
    lists
        .update_progress("OL893415W", ProgressUpdate::new(412, None))
        .await
        .unwrap();

    storage.set_offline(true);
    assert!(lists.reconcile_quietly().await.is_none());

    storage.set_offline(false);
    assert_eq!(lists.list(Collection::CurrentlyReading).await.unwrap().len(), 1);
    assert!(matches!(
        lists.reconcile_quietly().await,
        Some(Reconciliation::Completed { .. })
    ));
}

// =============================================================================
// Layout Tests
// =============================================================================

#[tokio::test]
async fn test_document_layout_on_disk() {
    let dir = TempDir::new().unwrap();
    let lists = local_lists(&dir);
    lists.add_to_read_list(&dune()).await.unwrap();
    lists.add_to_bookshelf(&dune()).await.unwrap();

    let queued = dir.path().join("users/reader-1/readBooks/OL893415W.json");
    let shelved = dir.path().join("users/reader-1/bookshelf/OL893415W.json");
    assert!(queued.exists());
    assert!(shelved.exists());

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&queued).unwrap()).unwrap();
    assert_eq!(doc["key"], "OL893415W");
    assert_eq!(doc["numberOfPages"], 412);
    assert!(doc["addedAt"].is_string());
    assert!(doc.get("currentPage").is_none());
}

#[tokio::test]
async fn test_corrupt_document_is_reported() {
    let dir = TempDir::new().unwrap();
    let lists = local_lists(&dir);
    lists.add_to_read_list(&dune()).await.unwrap();

    std::fs::write(
        dir.path().join("users/reader-1/readBooks/OL893415W.json"),
        b"{ not json",
    )
    .unwrap();

    let err = lists.list(Collection::ToRead).await.unwrap_err();
    assert!(matches!(
        err,
        ShelfError::Storage(shelfwise_core::StorageError::Corrupt { .. })
    ));
}
