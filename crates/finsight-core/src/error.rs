//! Error types for finsight-core

use thiserror::Error;

/// Result type alias for finsight-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// Delegation to a team member failed
    #[error("Agent delegation failed: {0}")]
    DelegationFailed(String),
}
