//! Book records as stored in a user's collections

use super::BookKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An author reference as provided by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub key: String,
}

impl Author {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// Catalog fields a record is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSource {
    pub key: BookKey,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub cover_id: Option<Vec<i64>>,
    #[serde(default)]
    pub number_of_pages: Option<u32>,
}

impl BookSource {
    pub fn new(key: BookKey, title: impl Into<String>) -> Self {
        Self {
            key,
            title: title.into(),
            authors: Vec::new(),
            cover_id: None,
            number_of_pages: None,
        }
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.authors.push(author);
        self
    }

    pub fn with_pages(mut self, pages: u32) -> Self {
        self.number_of_pages = Some(pages);
        self
    }

    pub fn with_cover(mut self, cover_id: i64) -> Self {
        self.cover_id.get_or_insert_with(Vec::new).push(cover_id);
        self
    }
}

impl From<&BookRecord> for BookSource {
    fn from(record: &BookRecord) -> Self {
        Self {
            key: record.key.clone(),
            title: record.title.clone(),
            authors: record.authors.clone(),
            cover_id: record.cover_id.clone(),
            number_of_pages: record.number_of_pages,
        }
    }
}

/// A book stored in one of the user's collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Normalized catalog key, also the document id
    pub key: BookKey,

    pub title: String,

    /// Authors in catalog order
    #[serde(default)]
    pub authors: Vec<Author>,

    #[serde(default)]
    pub cover_id: Option<Vec<i64>>,

    /// Total pages, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<u32>,

    /// Only meaningful while currently reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,

    pub added_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookRecord {
    /// Build a fresh record from catalog fields
    pub fn from_source(source: &BookSource, now: DateTime<Utc>) -> Self {
        Self {
            key: source.key.clone(),
            title: source.title.clone(),
            authors: source.authors.clone(),
            cover_id: source.cover_id.clone(),
            number_of_pages: source.number_of_pages,
            current_page: None,
            added_at: now,
            updated_at: None,
        }
    }

    /// Initialize progress tracking fields
    pub fn start_reading(mut self, now: DateTime<Utc>) -> Self {
        self.current_page = Some(0);
        self.updated_at = Some(now);
        self
    }

    pub fn current_page(&self) -> u32 {
        self.current_page.unwrap_or(0)
    }

    pub fn total_pages(&self) -> u32 {
        self.number_of_pages.unwrap_or(0)
    }

    /// A book is complete once a known page total has been reached
    pub fn is_complete(&self) -> bool {
        is_complete(self.current_page(), self.total_pages())
    }

    /// Whole percent read, 0 when the total is unknown
    pub fn percent_complete(&self) -> u32 {
        let total = self.total_pages();
        if total == 0 {
            return 0;
        }
        u32::try_from(u64::from(self.current_page()) * 100 / u64::from(total)).unwrap_or(u32::MAX)
    }

    pub fn progress_label(&self) -> String {
        if self.total_pages() > 0 {
            format!(
                "{} / {} pages ({}%)",
                self.current_page(),
                self.total_pages(),
                self.percent_complete()
            )
        } else {
            format!("{} pages read", self.current_page())
        }
    }

    /// Comma separated author names
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            "Unknown author".to_string()
        } else {
            self.authors
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// The first cover identifier, if any
    pub fn primary_cover(&self) -> Option<i64> {
        self.cover_id.as_ref().and_then(|c| c.first().copied())
    }
}

/// Completion predicate shared by records and raw page counts
pub fn is_complete(current_page: u32, number_of_pages: u32) -> bool {
    number_of_pages > 0 && current_page >= number_of_pages
}

/// Number of books in each collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
    pub to_read: usize,
    pub currently_reading: usize,
    pub finished: usize,
}
