//! Reading list handlers

use super::{ApiError, RequestSession};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shelfwise_core::{BookRecord, BookSource, Collection};

/// List one collection, most recent first
pub async fn list_collection(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
    Path(collection): Path<String>,
) -> Result<Json<Vec<BookRecord>>, ApiError> {
    let collection: Collection = collection.parse()?;
    let books = state.lists_for(session).list(collection).await?;
    Ok(Json(books))
}

/// Put a book into a collection.
///
/// Posting to currently-reading also removes the book from the to-read list.
pub async fn add_to_collection(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
    Path(collection): Path<String>,
    Json(book): Json<BookSource>,
) -> Result<(StatusCode, Json<BookRecord>), ApiError> {
    let collection: Collection = collection.parse()?;
    let lists = state.lists_for(session);

    let record = match collection {
        Collection::ToRead => lists.add_to_read_list(&book).await?,
        Collection::CurrentlyReading => lists.start_reading(&book).await?,
        Collection::Bookshelf => lists.add_to_bookshelf(&book).await?,
    };
    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch one record
pub async fn get_record(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
    Path((collection, key)): Path<(String, String)>,
) -> Result<Json<BookRecord>, ApiError> {
    let collection: Collection = collection.parse()?;
    state
        .lists_for(session)
        .get(collection, &key)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, format!("{} is not in {}", key, collection)))
}

/// Remove a book from a collection
pub async fn remove_record(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
    Path((collection, key)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let collection: Collection = collection.parse()?;
    state.lists_for(session).remove(collection, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Start reading a book already on the to-read list
pub async fn start_from_queue(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
    Path((collection, key)): Path<(String, String)>,
) -> Result<Json<BookRecord>, ApiError> {
    let collection: Collection = collection.parse()?;
    if collection != Collection::ToRead {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Only books in {} can be started", Collection::ToRead),
        ));
    }
    let record = state.lists_for(session).promote(&key).await?;
    Ok(Json(record))
}
