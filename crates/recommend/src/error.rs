//! Recommendation error types.

use thiserror::Error;

/// Errors that can occur while fetching recommendations.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The scoring endpoint could not be reached or returned an unreadable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The scoring endpoint answered with a non-success status.
    #[error("Recommendation API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The product catalog could not be read.
    #[error("Catalog error: {0}")]
    Gateway(#[from] gateway::GatewayError),
}

/// Result type for recommendation operations.
pub type Result<T> = std::result::Result<T, RecommendError>;
