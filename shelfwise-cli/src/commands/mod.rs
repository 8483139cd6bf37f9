//! CLI command implementations

mod catalog;
mod lists;
mod reading;

pub use catalog::{author, bestsellers, search, subject};
pub use lists::{add, list, remove, shelve, start};
pub use reading::{latest, progress, reconcile, stats};

use anyhow::{Context, Result};
use shelfwise_core::catalog::OpenLibrary;
use shelfwise_core::{
    BookRecord, EventBus, LocalStorage, ReadingLists, RecordStore, StaticSession, UserId,
};
use std::path::Path;
use std::sync::Arc;

/// Everything a command needs: the user's lists and the catalog
pub struct Shelf {
    pub lists: ReadingLists,
    pub catalog: OpenLibrary,
}

impl Shelf {
    pub fn open(data_dir: &Path, user: Option<&str>, catalog_url: &str) -> Result<Self> {
        let user = user
            .map(UserId::parse)
            .transpose()
            .context("Invalid --user")?;
        tracing::debug!("Using data directory {}", data_dir.display());

        let store = RecordStore::new(Arc::new(LocalStorage::new(data_dir)));
        let lists = ReadingLists::new(store, Arc::new(StaticSession::from(user)), EventBus::new());

        Ok(Self {
            lists,
            catalog: OpenLibrary::with_base_url(catalog_url),
        })
    }
}

/// One-line summary of a record
fn summary(record: &BookRecord) -> String {
    format!("{:<14} {} by {}", record.key, record.title, record.author_line())
}
