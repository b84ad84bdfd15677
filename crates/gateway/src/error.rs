use thiserror::Error;

/// Error codes reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    NetworkRequestFailed,
    EmailAlreadyInUse,
    WrongPassword,
    UserNotFound,
    ResetPasswordError,
    PopupClosedByUser,
    WeakPassword,
    RequiresRecentLogin,
    /// Any code without a dedicated variant.
    Other(String),
}

impl AuthErrorCode {
    /// Parses a provider code such as `auth/wrong-password`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/network-request-failed" => AuthErrorCode::NetworkRequestFailed,
            "auth/email-already-in-use" => AuthErrorCode::EmailAlreadyInUse,
            "auth/wrong-password" => AuthErrorCode::WrongPassword,
            "auth/user-not-found" => AuthErrorCode::UserNotFound,
            "auth/reset-password-error" => AuthErrorCode::ResetPasswordError,
            "auth/popup-closed-by-user" => AuthErrorCode::PopupClosedByUser,
            "auth/weak-password" => AuthErrorCode::WeakPassword,
            "auth/requires-recent-login" => AuthErrorCode::RequiresRecentLogin,
            other => AuthErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            AuthErrorCode::NetworkRequestFailed => "auth/network-request-failed",
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::ResetPasswordError => "auth/reset-password-error",
            AuthErrorCode::PopupClosedByUser => "auth/popup-closed-by-user",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::RequiresRecentLogin => "auth/requires-recent-login",
            AuthErrorCode::Other(code) => code,
        }
    }

    /// The provider's own description of the error.
    pub fn default_message(&self) -> &'static str {
        match self {
            AuthErrorCode::NetworkRequestFailed => {
                "A network error (such as timeout, interrupted connection or unreachable host) has occurred."
            }
            AuthErrorCode::EmailAlreadyInUse => {
                "The email address is already in use by another account."
            }
            AuthErrorCode::WrongPassword => {
                "The password is invalid or the user does not have a password."
            }
            AuthErrorCode::UserNotFound => {
                "There is no user record corresponding to this identifier. The user may have been deleted."
            }
            AuthErrorCode::ResetPasswordError => "Failed to send password reset email.",
            AuthErrorCode::PopupClosedByUser => {
                "The popup has been closed by the user before finalizing the operation."
            }
            AuthErrorCode::WeakPassword => "Password should be at least 6 characters.",
            AuthErrorCode::RequiresRecentLogin => {
                "This operation is sensitive and requires recent authentication."
            }
            AuthErrorCode::Other(_) => "An internal error has occurred.",
        }
    }
}

impl std::fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The identity provider rejected the request.
    #[error("{message} ({code})")]
    Auth {
        code: AuthErrorCode,
        message: String,
    },

    /// The request did not complete before its deadline.
    #[error("Request timeout, please try again")]
    Timeout,

    /// A document or stored file does not exist.
    #[error("Not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// The backing service failed or could not be reached.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// A document could not be converted to or from its typed form.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    /// An identity-provider error carrying the provider's default message.
    pub fn auth(code: AuthErrorCode) -> Self {
        let message = code.default_message().to_string();
        GatewayError::Auth { code, message }
    }

    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        GatewayError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// The provider error code, if this is an identity-provider error.
    pub fn auth_code(&self) -> Option<&AuthErrorCode> {
        match self {
            GatewayError::Auth { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
