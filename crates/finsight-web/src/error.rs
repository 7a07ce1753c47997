//! Web error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Web front end error type
#[derive(Error, Debug)]
pub enum WebError {
    /// Session store failure
    #[error("Session error: {0}")]
    Session(String),

    /// Template rendering failure
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<tower_sessions::session::Error> for WebError {
    fn from(err: tower_sessions::session::Error) -> Self {
        WebError::Session(err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong. Please try again later.",
        )
            .into_response()
    }
}
