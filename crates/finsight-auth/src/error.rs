//! Error types for auth operations

use thiserror::Error;

/// Result type for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur when talking to the hosted auth provider
#[derive(Error, Debug)]
pub enum AuthError {
    /// The access token was rejected by the provider
    #[error("Unauthorized: access token rejected")]
    Unauthorized,

    /// Provider request failed
    #[error("Auth request failed: {0}")]
    RequestFailed(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected auth response: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Auth configuration error: {0}")]
    Configuration(String),
}
