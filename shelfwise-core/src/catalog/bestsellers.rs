//! New York Times bestseller lists

use super::CatalogResult;
use crate::error::CatalogError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BESTSELLER_LIST: &str = "hardcover-fiction";

const NYT_BOOKS_URL: &str = "https://api.nytimes.com/svc/books/v3";

/// Environment variable holding the API key
pub(crate) const API_KEY_VAR: &str = "NYT_API_KEY";

/// One entry on a bestseller list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bestseller {
    #[serde(default)]
    pub rank: u32,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub primary_isbn13: String,
    pub book_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: ListResults,
}

#[derive(Debug, Deserialize)]
struct ListResults {
    #[serde(default)]
    books: Vec<RawBestseller>,
}

#[derive(Debug, Deserialize)]
struct RawBestseller {
    #[serde(default)]
    rank: u32,
    title: String,
    author: String,
    #[serde(default)]
    publisher: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    primary_isbn13: String,
    book_image: Option<String>,
}

impl From<RawBestseller> for Bestseller {
    fn from(raw: RawBestseller) -> Self {
        Self {
            rank: raw.rank,
            title: raw.title,
            author: raw.author,
            publisher: raw.publisher,
            description: raw.description,
            primary_isbn13: raw.primary_isbn13,
            book_image: raw.book_image.filter(|url| !url.is_empty()),
        }
    }
}

/// Source of curated bestseller lists
#[async_trait]
pub trait BestsellerFeed: Send + Sync {
    /// Current entries of a named list
    async fn current(&self, list: &str) -> CatalogResult<Vec<Bestseller>>;

    /// Like [`current`](Self::current), but a failed fetch yields an empty list
    async fn current_or_empty(&self, list: &str) -> Vec<Bestseller> {
        match self.current(list).await {
            Ok(books) => books,
            Err(e) => {
                tracing::error!("Bestseller list {} unavailable: {}", list, e);
                Vec::new()
            }
        }
    }
}

/// Client for the NYT Books API
#[derive(Clone)]
pub struct NytBestsellers {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl NytBestsellers {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: NYT_BOOKS_URL.to_string(),
        }
    }

    /// Read the key from `NYT_API_KEY`
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_KEY_VAR).ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn list_url(&self, list: &str, api_key: &str) -> String {
        format!(
            "{}/lists/current/{}.json?api-key={}",
            self.base_url,
            urlencoding::encode(list),
            urlencoding::encode(api_key)
        )
    }
}

fn parse_list(body: &str) -> CatalogResult<Vec<Bestseller>> {
    let response: ListResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(response
        .results
        .books
        .into_iter()
        .map(Bestseller::from)
        .collect())
}

#[async_trait]
impl BestsellerFeed for NytBestsellers {
    async fn current(&self, list: &str) -> CatalogResult<Vec<Bestseller>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CatalogError::MissingApiKey(API_KEY_VAR))?;

        tracing::debug!("Fetching bestseller list {}", list);
        let body = self
            .client
            .get(self.list_url(list, api_key))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_list(&body)
    }
}
