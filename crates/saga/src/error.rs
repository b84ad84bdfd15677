//! Workflow error taxonomy.

use domain::DomainError;
use gateway::{AuthErrorCode, GatewayError};
use thiserror::Error;

use crate::services::otp::OtpError;

const NETWORK_MESSAGE: &str = "Network error has occured. Please try again.";
const CONFLICT_MESSAGE: &str = "Email is already in use. Please use another email";
const CREDENTIAL_MESSAGE: &str = "Incorrect email or password";
const RESET_MESSAGE: &str =
    "Failed to send password reset email. Did you type your email correctly?";
const TIMEOUT_MESSAGE: &str = "Request timeout, please try again";
const CANCELLED_MESSAGE: &str = "Request was cancelled";

/// Errors that end a workflow.
///
/// Provider and store errors are classified when they cross into the
/// pipeline; `user_message` then maps every kind to the text shown to the
/// user.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The identity provider or an endpoint could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// Wrong password or unknown user. Deliberately carries no detail.
    #[error("invalid credentials")]
    Credential,

    /// Email already registered.
    #[error("email already in use")]
    Conflict,

    /// The password-reset request failed.
    #[error("password reset failed")]
    Reset,

    /// Malformed input (OTP, checkout fields).
    #[error("{0}")]
    Validation(String),

    /// A deadline-bound read did not finish in time.
    #[error("request timed out")]
    Timeout,

    /// A required document was missing.
    #[error("{0}")]
    NotFound(String),

    /// An HTTP endpoint answered with an error status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The workflow's cancellation token fired.
    #[error("workflow cancelled")]
    Cancelled,

    /// Anything else; the message is passed through.
    #[error("{0}")]
    Unknown(String),
}

impl WorkflowError {
    /// The message shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Network(_) => NETWORK_MESSAGE.to_string(),
            WorkflowError::Credential => CREDENTIAL_MESSAGE.to_string(),
            WorkflowError::Conflict => CONFLICT_MESSAGE.to_string(),
            WorkflowError::Reset => RESET_MESSAGE.to_string(),
            WorkflowError::Timeout => TIMEOUT_MESSAGE.to_string(),
            WorkflowError::Cancelled => CANCELLED_MESSAGE.to_string(),
            WorkflowError::Validation(message)
            | WorkflowError::NotFound(message)
            | WorkflowError::Http { message, .. }
            | WorkflowError::Unknown(message) => message.clone(),
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::Network(_) => "network",
            WorkflowError::Credential => "credential",
            WorkflowError::Conflict => "conflict",
            WorkflowError::Reset => "reset",
            WorkflowError::Validation(_) => "validation",
            WorkflowError::Timeout => "timeout",
            WorkflowError::NotFound(_) => "not_found",
            WorkflowError::Http { .. } => "http",
            WorkflowError::Cancelled => "cancelled",
            WorkflowError::Unknown(_) => "unknown",
        }
    }
}

impl From<GatewayError> for WorkflowError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Auth { code, message } => match code {
                AuthErrorCode::NetworkRequestFailed => WorkflowError::Network(message),
                AuthErrorCode::EmailAlreadyInUse => WorkflowError::Conflict,
                AuthErrorCode::WrongPassword | AuthErrorCode::UserNotFound => {
                    WorkflowError::Credential
                }
                AuthErrorCode::ResetPasswordError => WorkflowError::Reset,
                _ => WorkflowError::Unknown(message),
            },
            GatewayError::Timeout => WorkflowError::Timeout,
            err @ GatewayError::NotFound { .. } => WorkflowError::NotFound(err.to_string()),
            other => WorkflowError::Unknown(other.to_string()),
        }
    }
}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        WorkflowError::Validation(err.to_string())
    }
}

impl From<OtpError> for WorkflowError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::Http(e) => WorkflowError::Network(e.to_string()),
            OtpError::Api { status, message } => WorkflowError::Http { status, message },
        }
    }
}

/// Convenience type alias for workflow results.
pub type Result<T> = std::result::Result<T, WorkflowError>;
