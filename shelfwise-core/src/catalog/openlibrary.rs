//! Open Library client

use super::{AuthorDetails, Catalog, CatalogResult, SearchHit, WorkDetails, WorkLink};
use crate::error::CatalogError;
use crate::types::{Author, BookKey};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org";

/// Editions inspected for a page count and fallback cover
const EDITION_SAMPLE: usize = 5;

/// Results requested per subject
const SUBJECT_LIMIT: usize = 20;

/// Text fields come either as a plain string or as `{ "type": ..., "value": ... }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Plain(String),
    Typed { value: String },
}

impl TextValue {
    fn into_string(self) -> String {
        match self {
            TextValue::Plain(s) => s,
            TextValue::Typed { value } => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    key: String,
    title: String,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    author_key: Vec<String>,
    cover_i: Option<i64>,
    first_publish_year: Option<i32>,
}

impl From<SearchDoc> for SearchHit {
    fn from(doc: SearchDoc) -> Self {
        Self {
            key: doc.key,
            title: doc.title,
            author_names: doc.author_name,
            author_keys: doc.author_key,
            cover_id: doc.cover_i,
            first_publish_year: doc.first_publish_year,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubjectResponse {
    #[serde(default)]
    works: Vec<SubjectWork>,
}

#[derive(Debug, Deserialize)]
struct SubjectWork {
    key: String,
    title: String,
    #[serde(default)]
    authors: Vec<Author>,
    cover_id: Option<i64>,
    first_publish_year: Option<i32>,
}

impl From<SubjectWork> for SearchHit {
    fn from(work: SubjectWork) -> Self {
        let (author_names, author_keys) = work
            .authors
            .into_iter()
            .map(|a| (a.name, a.key))
            .unzip();
        Self {
            key: work.key,
            title: work.title,
            author_names,
            author_keys,
            cover_id: work.cover_id,
            first_publish_year: work.first_publish_year,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WorkResponse {
    key: String,
    title: String,
    description: Option<TextValue>,
    #[serde(default)]
    covers: Vec<i64>,
    #[serde(default)]
    subjects: Vec<String>,
    #[serde(default)]
    subject_places: Vec<String>,
    #[serde(default)]
    subject_times: Vec<String>,
    #[serde(default)]
    links: Vec<WorkLink>,
    #[serde(default)]
    authors: Vec<WorkAuthorRef>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthorRef {
    author: Option<KeyRef>,
}

#[derive(Debug, Deserialize)]
struct KeyRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct EditionsResponse {
    #[serde(default)]
    entries: Vec<Edition>,
}

#[derive(Debug, Deserialize)]
struct Edition {
    number_of_pages: Option<u32>,
    #[serde(default)]
    covers: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    name: String,
    bio: Option<TextValue>,
    #[serde(default)]
    photos: Vec<i64>,
}

impl From<AuthorResponse> for AuthorDetails {
    fn from(author: AuthorResponse) -> Self {
        Self {
            name: author.name,
            bio: author.bio.map(TextValue::into_string),
            photos: author.photos,
        }
    }
}

/// Combine a work with a sample of its editions and its resolved authors.
///
/// The page count comes from the first edition that has one. Work covers win;
/// otherwise the first edition with covers supplies them. Authors that could
/// not be resolved are dropped.
fn merge_work(
    work: WorkResponse,
    editions: &[Edition],
    authors: Vec<Option<Author>>,
) -> CatalogResult<WorkDetails> {
    let key = BookKey::parse(&work.key).map_err(|e| CatalogError::Decode(e.to_string()))?;

    let number_of_pages = editions.iter().find_map(|e| e.number_of_pages);
    let covers = if !work.covers.is_empty() {
        Some(work.covers)
    } else {
        editions
            .iter()
            .find(|e| !e.covers.is_empty())
            .map(|e| e.covers.clone())
    };

    Ok(WorkDetails {
        key,
        title: work.title,
        description: work.description.map(TextValue::into_string),
        covers,
        subjects: work.subjects,
        subject_places: work.subject_places,
        subject_times: work.subject_times,
        links: work.links,
        authors: authors.into_iter().flatten().collect(),
        number_of_pages,
    })
}

/// HTTP client for the Open Library API
#[derive(Clone)]
pub struct OpenLibrary {
    client: reqwest::Client,
    base_url: String,
}

impl Default for OpenLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenLibrary {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_CATALOG_URL)
    }

    /// Point the client at a mirror or test server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// GET a JSON document, `None` on 404
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> CatalogResult<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.error_for_status()?.json::<T>().await?;
        Ok(Some(body))
    }

    async fn resolve_author(&self, key: &str) -> Option<Author> {
        match self.fetch::<AuthorResponse>(&format!("{}.json", key)).await {
            Ok(Some(author)) => Some(Author::new(author.name, key)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to fetch author {}: {}", key, e);
                None
            }
        }
    }
}

#[async_trait]
impl Catalog for OpenLibrary {
    async fn search(&self, query: &str) -> CatalogResult<Vec<SearchHit>> {
        let path = format!("/search.json?q={}&language=eng", urlencoding::encode(query));
        let response: Option<SearchResponse> = self.fetch(&path).await?;
        Ok(response
            .map(|r| r.docs.into_iter().map(SearchHit::from).collect())
            .unwrap_or_default())
    }

    async fn books_by_subject(&self, subject: &str) -> CatalogResult<Vec<SearchHit>> {
        let path = format!(
            "/subjects/{}.json?limit={}",
            urlencoding::encode(subject),
            SUBJECT_LIMIT
        );
        let response: Option<SubjectResponse> = self.fetch(&path).await?;
        Ok(response
            .map(|r| r.works.into_iter().map(SearchHit::from).collect())
            .unwrap_or_default())
    }

    async fn work(&self, key: &BookKey) -> CatalogResult<Option<WorkDetails>> {
        let path = key.catalog_path();
        let Some(work) = self
            .fetch::<WorkResponse>(&format!("{}.json", path))
            .await?
        else {
            return Ok(None);
        };

        let editions = self
            .fetch::<EditionsResponse>(&format!(
                "{}/editions.json?limit={}",
                path, EDITION_SAMPLE
            ))
            .await?
            .map(|e| e.entries)
            .unwrap_or_default();

        let mut authors = Vec::with_capacity(work.authors.len());
        for entry in &work.authors {
            authors.push(match &entry.author {
                Some(author) => self.resolve_author(&author.key).await,
                None => None,
            });
        }

        merge_work(work, &editions, authors).map(Some)
    }

    async fn author(&self, key: &str) -> CatalogResult<Option<AuthorDetails>> {
        let id = key.trim().trim_start_matches("/authors/");
        let path = format!("/authors/{}.json", urlencoding::encode(id));
        Ok(self
            .fetch::<AuthorResponse>(&path)
            .await?
            .map(AuthorDetails::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_json(covers: &str) -> WorkResponse {
        serde_json::from_str(&format!(
            r#"{{
                "key": "/works/OL45804W",
                "title": "Fantastic Mr Fox",
                "description": {{"type": "/type/text", "value": "A fox outwits three farmers."}},
                "covers": {covers},
                "subjects": ["Foxes", "Farmers"],
                "subject_places": ["England"],
                "links": [{{"title": "Wikipedia", "url": "https://en.wikipedia.org/wiki/Fantastic_Mr_Fox"}}],
                "authors": [
                    {{"author": {{"key": "/authors/OL34184A"}}, "type": {{"key": "/type/author_role"}}}},
                    {{"type": {{"key": "/type/author_role"}}}}
                ]
            }}"#
        ))
        .unwrap()
    }

    fn editions() -> Vec<Edition> {
        serde_json::from_str::<EditionsResponse>(
            r#"{"entries": [
                {"title": "no pages"},
                {"number_of_pages": 96, "covers": []},
                {"number_of_pages": 120, "covers": [11, 12]}
            ]}"#,
        )
        .unwrap()
        .entries
    }

    #[test]
    fn test_merge_takes_first_page_count() {
        let merged = merge_work(
            work_json("[6498519]"),
            &editions(),
            vec![Some(Author::new("Roald Dahl", "/authors/OL34184A")), None],
        )
        .unwrap();

        assert_eq!(merged.key.as_str(), "OL45804W");
        assert_eq!(merged.number_of_pages, Some(96));
        assert_eq!(merged.covers, Some(vec![6498519]));
        assert_eq!(merged.description.as_deref(), Some("A fox outwits three farmers."));
        assert_eq!(merged.authors, vec![Author::new("Roald Dahl", "/authors/OL34184A")]);
        assert_eq!(merged.subject_places, vec!["England"]);
        assert!(merged.subject_times.is_empty());
        assert_eq!(merged.links[0].title, "Wikipedia");
    }

    #[test]
    fn test_merge_falls_back_to_edition_covers() {
        let merged = merge_work(work_json("[]"), &editions(), Vec::new()).unwrap();
        assert_eq!(merged.covers, Some(vec![11, 12]));

        let merged = merge_work(work_json("[]"), &[], Vec::new()).unwrap();
        assert_eq!(merged.covers, None);
        assert_eq!(merged.number_of_pages, None);
    }

    #[test]
    fn test_search_doc_mapping() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"numFound": 1, "docs": [{
                "key": "/works/OL893415W",
                "title": "Dune",
                "author_name": ["Frank Herbert"],
                "author_key": ["OL79034A"],
                "cover_i": 11481354,
                "first_publish_year": 1965
            }, {
                "key": "/works/OL1W",
                "title": "Anonymous"
            }]}"#,
        )
        .unwrap();
        let hits: Vec<SearchHit> = response.docs.into_iter().map(SearchHit::from).collect();

        assert_eq!(hits[0].author_names, vec!["Frank Herbert"]);
        assert_eq!(hits[0].cover_id, Some(11481354));
        assert_eq!(hits[0].book_key().unwrap().as_str(), "OL893415W");
        assert!(hits[1].author_names.is_empty());
        assert_eq!(hits[1].first_publish_year, None);
    }

    #[test]
    fn test_subject_work_mapping() {
        let response: SubjectResponse = serde_json::from_str(
            r#"{"name": "science_fiction", "works": [{
                "key": "/works/OL27448W",
                "title": "The Lord of the Rings",
                "authors": [{"key": "/authors/OL26320A", "name": "J.R.R. Tolkien"}],
                "cover_id": 14625765,
                "first_publish_year": 1954
            }]}"#,
        )
        .unwrap();
        let hit = SearchHit::from(response.works.into_iter().next().unwrap());
        assert_eq!(hit.author_names, vec!["J.R.R. Tolkien"]);
        assert_eq!(hit.author_keys, vec!["/authors/OL26320A"]);
        assert_eq!(hit.cover_id, Some(14625765));
    }

    #[test]
    fn test_author_bio_variants() {
        let plain: AuthorResponse =
            serde_json::from_str(r#"{"name": "Roald Dahl", "bio": "British novelist."}"#).unwrap();
        assert_eq!(AuthorDetails::from(plain).bio.as_deref(), Some("British novelist."));

        let typed: AuthorResponse = serde_json::from_str(
            r#"{"name": "Roald Dahl", "bio": {"type": "/type/text", "value": "Wrote for children."}, "photos": [1]}"#,
        )
        .unwrap();
        let details = AuthorDetails::from(typed);
        assert_eq!(details.bio.as_deref(), Some("Wrote for children."));
        assert_eq!(details.photos, vec![1]);
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = OpenLibrary::with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
