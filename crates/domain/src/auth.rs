//! Identity payloads issued by the identity provider.

use common::UserId;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::timestamp::Timestamp;

/// Length of a one-time verification code.
pub const OTP_LENGTH: usize = 6;

/// Federated sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
    Github,
}

impl Provider {
    /// The provider id the identity provider reports for accounts created
    /// through this provider.
    pub fn provider_id(&self) -> ProviderId {
        match self {
            Provider::Google => ProviderId::Google,
            Provider::Facebook => ProviderId::Facebook,
            Provider::Github => ProviderId::Github,
        }
    }
}

/// How an identity was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "google.com")]
    Google,
    #[serde(rename = "facebook.com")]
    Facebook,
    #[serde(rename = "github.com")]
    Github,
}

impl ProviderId {
    /// Returns true for email/password accounts, which require an account
    /// to be created before their first sign-in.
    pub fn is_password(&self) -> bool {
        matches!(self, ProviderId::Password)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Password => "password",
            ProviderId::Google => "google.com",
            ProviderId::Facebook => "facebook.com",
            ProviderId::Github => "github.com",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated identity, as carried by account creation, sign-in and
/// "auth state changed" signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthIdentity {
    pub uid: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub provider_id: ProviderId,
    #[serde(default)]
    pub creation_time: Option<Timestamp>,
}

/// Checks that a one-time code is exactly six ASCII digits.
pub fn validate_otp(code: &str) -> Result<(), DomainError> {
    if code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(DomainError::InvalidOtp)
    }
}
