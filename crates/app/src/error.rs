//! Application error types.

use thiserror::Error;

/// Errors surfaced by the storefront driver.
#[derive(Debug, Error)]
pub enum AppError {
    /// A command could not be parsed or its result could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An HTTP client could not be built.
    #[error("OTP client error: {0}")]
    Otp(#[from] saga::OtpError),

    #[error("Recommendation client error: {0}")]
    Recommend(#[from] recommend::RecommendError),

    /// A direct backend call failed.
    #[error("Backend error: {0}")]
    Gateway(#[from] gateway::GatewayError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
