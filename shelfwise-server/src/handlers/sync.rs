//! Server-Sent Events handler for list change notifications

use super::{ApiError, RequestSession};
use crate::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use shelfwise_core::SessionProvider;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// SSE stream of `booksUpdated` events for the requesting user
pub async fn sync_events(
    State(state): State<AppState>,
    RequestSession(session): RequestSession,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let user = session.require_user()?;
    let stream = BroadcastStream::new(state.subscribe());

    let event_stream = stream.filter_map(move |result| match result {
        Ok(event) if *event.user() == user => {
            let data = serde_json::json!({ "user": event.user() }).to_string();
            Some(Ok(Event::default().event(event.name().as_str()).data(data)))
        }
        Ok(_) => None,
        Err(_) => None, // Lagged, skip
    });

    Ok(Sse::new(event_stream).keep_alive(KeepAlive::default()))
}
