//! Page progress for books in the currently-reading collection

use crate::error::{ParseError, Result, ShelfError};
use crate::session::SessionProvider;
use crate::store::RecordStore;
use crate::types::{BookKey, BookRecord, Collection};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A validated progress update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub current_page: u32,

    /// `None` leaves the stored total untouched
    pub total_pages: Option<u32>,
}

impl ProgressUpdate {
    pub fn new(current_page: u32, total_pages: Option<u32>) -> Self {
        Self {
            current_page,
            total_pages,
        }
    }

    /// Parse the free-text page and total fields a reader types in.
    ///
    /// An empty total means "not provided". Anything else must be a
    /// non-negative whole number.
    pub fn parse(page_input: &str, total_input: &str) -> std::result::Result<Self, ParseError> {
        let current_page = page_input
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseError::InvalidPage(page_input.to_string()))?;

        let total = total_input.trim();
        let total_pages = if total.is_empty() {
            None
        } else {
            Some(
                total
                    .parse::<u32>()
                    .map_err(|_| ParseError::InvalidTotal(total_input.to_string()))?,
            )
        };

        Ok(Self::new(current_page, total_pages))
    }

    /// Apply the update to a record, stamping `updated_at`
    pub fn apply(&self, record: &mut BookRecord) {
        record.current_page = Some(self.current_page);
        if let Some(total) = self.total_pages {
            record.number_of_pages = Some(total);
        }
        record.updated_at = Some(Utc::now());
    }
}

/// Writes page progress for the signed-in user's current books
#[derive(Clone)]
pub struct ProgressTracker {
    store: RecordStore,
    session: Arc<dyn SessionProvider>,
}

impl ProgressTracker {
    pub fn new(store: RecordStore, session: Arc<dyn SessionProvider>) -> Self {
        Self { store, session }
    }

    /// Parse raw text input and persist it.
    ///
    /// Input that does not parse is rejected before the store is touched.
    pub async fn submit(&self, book_id: &str, page_input: &str, total_input: &str) -> Result<BookRecord> {
        let update = ProgressUpdate::parse(page_input, total_input)?;
        self.update(book_id, update).await
    }

    /// Persist a progress update for a currently-reading book.
    ///
    /// Page counts are not range checked, so a current page past the total
    /// is stored as given.
    pub async fn update(&self, book_id: &str, update: ProgressUpdate) -> Result<BookRecord> {
        let user = self.session.require_user()?;
        let key = BookKey::parse(book_id)?;

        let mut record = self
            .store
            .get(&user, Collection::CurrentlyReading, &key)
            .await?
            .ok_or_else(|| ShelfError::NotFound(format!("{} is not currently being read", key)))?;

        update.apply(&mut record);
        self.store
            .put(&user, Collection::CurrentlyReading, &record)
            .await
            .inspect_err(|e| tracing::error!("Failed to update progress for {}: {}", key, e))?;

        tracing::info!("{} is on page {} of {}", key, record.current_page(), record.total_pages());
        Ok(record)
    }
}
