//! Read-only catalog and bestseller services
//!
//! These are external collaborators: the reading lists only consume the
//! fields a [`BookSource`] needs.

mod bestsellers;
mod openlibrary;

pub use bestsellers::{Bestseller, BestsellerFeed, NytBestsellers, DEFAULT_BESTSELLER_LIST};
pub use openlibrary::{OpenLibrary, DEFAULT_CATALOG_URL};

use crate::error::CatalogError;
use crate::types::{Author, BookKey, BookSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for catalog calls
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// A book in search or subject results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Catalog key as returned (`/works/...`)
    pub key: String,
    pub title: String,
    pub author_names: Vec<String>,
    pub author_keys: Vec<String>,
    pub cover_id: Option<i64>,
    pub first_publish_year: Option<i32>,
}

impl SearchHit {
    pub fn book_key(&self) -> Result<BookKey, crate::error::ParseError> {
        BookKey::parse(&self.key)
    }
}

/// A link attached to a work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLink {
    pub title: String,
    pub url: String,
}

/// Full details of a single work, with page count and authors resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDetails {
    pub key: BookKey,
    pub title: String,
    pub description: Option<String>,
    pub covers: Option<Vec<i64>>,
    pub subjects: Vec<String>,
    pub subject_places: Vec<String>,
    pub subject_times: Vec<String>,
    pub links: Vec<WorkLink>,
    pub authors: Vec<Author>,
    pub number_of_pages: Option<u32>,
}

impl From<&WorkDetails> for BookSource {
    fn from(work: &WorkDetails) -> Self {
        Self {
            key: work.key.clone(),
            title: work.title.clone(),
            authors: work.authors.clone(),
            cover_id: work.covers.clone(),
            number_of_pages: work.number_of_pages,
        }
    }
}

/// Author profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDetails {
    pub name: String,
    pub bio: Option<String>,
    pub photos: Vec<i64>,
}

/// Cover image sizes served by the covers endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Small,
    Medium,
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Small => "S",
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// URL of a cover image
pub fn cover_url(cover_id: i64, size: CoverSize) -> String {
    format!(
        "https://covers.openlibrary.org/b/id/{}-{}.jpg",
        cover_id,
        size.suffix()
    )
}

/// Book metadata lookups
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Free-text title search
    async fn search(&self, query: &str) -> CatalogResult<Vec<SearchHit>>;

    /// Popular works for a subject slug such as `science_fiction`
    async fn books_by_subject(&self, subject: &str) -> CatalogResult<Vec<SearchHit>>;

    /// Work details, `None` when the catalog does not know the key
    async fn work(&self, key: &BookKey) -> CatalogResult<Option<WorkDetails>>;

    /// Author profile by key (`/authors/OL1A` or `OL1A`)
    async fn author(&self, key: &str) -> CatalogResult<Option<AuthorDetails>>;

    /// Works by an author, via search
    async fn books_by_author(&self, name: &str) -> CatalogResult<Vec<SearchHit>> {
        self.search(&format!("author:\"{}\"", name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_url() {
        assert_eq!(
            cover_url(8231856, CoverSize::Medium),
            "https://covers.openlibrary.org/b/id/8231856-M.jpg"
        );
        assert_eq!(
            cover_url(1, CoverSize::Large),
            "https://covers.openlibrary.org/b/id/1-L.jpg"
        );
    }

    #[test]
    fn test_work_details_into_book_source() {
        let work = WorkDetails {
            key: BookKey::parse("/works/OL1W").unwrap(),
            title: "Dune".to_string(),
            description: None,
            covers: Some(vec![42]),
            subjects: Vec::new(),
            subject_places: Vec::new(),
            subject_times: Vec::new(),
            links: Vec::new(),
            authors: vec![Author::new("Frank Herbert", "/authors/OL79034A")],
            number_of_pages: Some(412),
        };
        let source = BookSource::from(&work);
        assert_eq!(source.key.as_str(), "OL1W");
        assert_eq!(source.cover_id, Some(vec![42]));
        assert_eq!(source.number_of_pages, Some(412));
        assert_eq!(source.authors.len(), 1);
    }
}
