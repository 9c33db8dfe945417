//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::dex::DexError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("page error")]
    Dex(#[from] DexError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
            AppError::Dex(e) => {
                // Details go to the log, the client gets a vague message
                tracing::error!(
                    error = %e,
                    source = ?std::error::Error::source(&e),
                    "page render failed"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
