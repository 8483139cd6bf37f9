//! Request handlers

mod catalog;
mod lists;
mod reading;
mod sync;

pub use catalog::*;
pub use lists::*;
pub use reading::*;
pub use sync::*;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shelfwise_core::error::{ParseError, ShelfError, StorageError};
use shelfwise_core::{StaticSession, UserId};

/// Header carrying the signed-in user
pub const USER_HEADER: &str = "x-user-id";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A failed request, rendered as JSON with a status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ShelfError> for ApiError {
    fn from(err: ShelfError) -> Self {
        let status = match &err {
            ShelfError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ShelfError::NotFound(_) => StatusCode::NOT_FOUND,
            ShelfError::Parse(ParseError::InvalidPage(_) | ParseError::InvalidTotal(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ShelfError::Parse(_) => StatusCode::BAD_REQUEST,
            ShelfError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            ShelfError::Storage(StorageError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ShelfError::Storage(StorageError::InvalidPath(_)) => StatusCode::BAD_REQUEST,
            ShelfError::Storage(StorageError::Corrupt { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            ShelfError::Catalog(_) => StatusCode::BAD_GATEWAY,
        };
        if status.is_server_error() {
            tracing::error!("{}", err);
        }
        Self::new(status, err.to_string())
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        ShelfError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// The session for one request, taken from the user header.
///
/// A missing header yields an anonymous session so that the reading lists
/// themselves reject the call as unauthenticated.
pub struct RequestSession(pub StaticSession);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.headers.get(USER_HEADER) {
            None => None,
            Some(value) => {
                let raw = value.to_str().map_err(|_| {
                    ParseError::InvalidUser(String::from_utf8_lossy(value.as_bytes()).into_owned())
                })?;
                Some(UserId::parse(raw)?)
            }
        };
        Ok(Self(StaticSession::from(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwise_core::CatalogError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ShelfError::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (ShelfError::NotFound("OL1W".into()), StatusCode::NOT_FOUND),
            (ParseError::InvalidPage("x".into()).into(), StatusCode::UNPROCESSABLE_ENTITY),
            (ParseError::InvalidKey("".into()).into(), StatusCode::BAD_REQUEST),
            (
                StorageError::Unavailable("offline".into()).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                StorageError::Corrupt {
                    path: "users/a/bookshelf/OL1W.json".into(),
                    reason: "eof".into(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (CatalogError::Request("timeout".into()).into(), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }
}
