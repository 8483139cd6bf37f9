//! Catalog lookups proxied for the frontend

use super::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shelfwise_core::catalog::{
    AuthorDetails, Bestseller, SearchHit, WorkDetails, DEFAULT_BESTSELLER_LIST,
};
use shelfwise_core::{BookKey, ShelfError};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct BestsellerQuery {
    pub list: Option<String>,
}

/// Search the catalog by title or author
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    if query.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }
    let hits = state
        .catalog
        .search(query.q.trim())
        .await
        .map_err(ShelfError::from)?;
    Ok(Json(hits))
}

/// Details of one work
pub async fn get_work(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<WorkDetails>, ApiError> {
    let key = BookKey::parse(&key)?;
    state
        .catalog
        .work(&key)
        .await
        .map_err(ShelfError::from)?
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("Unknown work {}", key)))
}

/// Popular works for a subject slug
pub async fn books_by_subject(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let hits = state
        .catalog
        .books_by_subject(subject.trim())
        .await
        .map_err(ShelfError::from)?;
    Ok(Json(hits))
}

/// An author with the works found under their name
#[derive(Debug, Serialize)]
pub struct AuthorPage {
    #[serde(flatten)]
    pub author: AuthorDetails,
    pub works: Vec<SearchHit>,
}

pub async fn get_author(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AuthorPage>, ApiError> {
    let author = state
        .catalog
        .author(&key)
        .await
        .map_err(ShelfError::from)?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("Unknown author {}", key)))?;
    let works = state
        .catalog
        .books_by_author(&author.name)
        .await
        .map_err(ShelfError::from)?;
    Ok(Json(AuthorPage { author, works }))
}

/// Current bestsellers; empty when the feed is unavailable
pub async fn list_bestsellers(
    State(state): State<AppState>,
    Query(query): Query<BestsellerQuery>,
) -> Json<Vec<Bestseller>> {
    let list = query.list.as_deref().unwrap_or(DEFAULT_BESTSELLER_LIST);
    Json(state.bestsellers.current_or_empty(list).await)
}
