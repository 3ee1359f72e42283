//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use todo_core::{ErrorBody, StoreError};

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The addressed todo does not exist. Expected, not a failure.
    #[error("todo not found")]
    NotFound,

    /// Pool or statement failure. Details are logged, never sent.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, Json(ErrorBody::not_found())).into_response(),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal())).into_response()
            }
        }
    }
}
