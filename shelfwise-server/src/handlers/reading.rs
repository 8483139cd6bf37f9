//! Progress, completion and stats handlers

use super::{ApiError, RequestSession};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shelfwise_core::{BookRecord, ReadingStats, Reconciliation};

/// Progress as typed into the reading form
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub page: String,

    /// Empty keeps the stored page count
    #[serde(default)]
    pub total: String,
}

/// Record the current page of a book being read.
///
/// Reaching the page total shelves the book right away; if that move fails
/// the book stays in currently reading and the next load retries it.
pub async fn update_progress(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
    Path(key): Path<String>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<BookRecord>, ApiError> {
    let lists = state.lists_for(session);
    let record = lists
        .progress()
        .submit(&key, &request.page, &request.total)
        .await?;
    if record.is_complete() {
        lists.reconcile_quietly().await;
    }
    Ok(Json(record))
}

/// The most recently updated book being read, or null.
///
/// A finished book left behind by an earlier failed move is shelved first.
pub async fn latest_reading(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
) -> Result<Json<Option<BookRecord>>, ApiError> {
    let lists = state.lists_for(session);
    let mut latest = lists.latest_updated().await?;
    if latest.as_ref().is_some_and(BookRecord::is_complete)
        && lists.reconcile_quietly().await.is_some()
    {
        latest = lists.latest_updated().await?;
    }
    Ok(Json(latest))
}

/// Move the latest book to the bookshelf if it is finished
pub async fn reconcile(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
) -> Result<Json<Reconciliation>, ApiError> {
    let outcome = state.lists_for(session).reconcile_completion().await?;
    Ok(Json(outcome))
}

/// Collection sizes
pub async fn reading_stats(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
) -> Result<Json<ReadingStats>, ApiError> {
    let stats = state.lists_for(session).stats().await?;
    Ok(Json(stats))
}
