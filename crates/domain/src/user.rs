//! User profile documents.

use serde::{Deserialize, Serialize};

use crate::auth::AuthIdentity;
use crate::basket::BasketItem;
use crate::timestamp::Timestamp;

/// Avatar assigned when the user or provider supplies none.
pub const DEFAULT_AVATAR: &str = "/images/defaultAvatar.jpg";

/// Profile banner assigned to every new user.
pub const DEFAULT_BANNER: &str = "/images/defaultBanner.jpg";

/// Display name for federated identities that carry none.
const FALLBACK_DISPLAY_NAME: &str = "User";

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Phone number as captured by the profile form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mobile {
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// A `users/{id}` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub fullname: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub banner: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub basket: Vec<BasketItem>,
    #[serde(default)]
    pub mobile: Mobile,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub date_joined: Option<Timestamp>,
}

impl User {
    /// Builds the profile written right after an email/password account is
    /// created. The email starts unverified.
    pub fn registration(fullname: &str, email: impl Into<String>, date_joined: Timestamp) -> Self {
        Self {
            fullname: normalize_fullname(fullname),
            avatar: DEFAULT_AVATAR.to_string(),
            banner: DEFAULT_BANNER.to_string(),
            email: email.into(),
            address: String::new(),
            basket: Vec::new(),
            mobile: Mobile::default(),
            role: Role::User,
            email_verified: false,
            date_joined: Some(date_joined),
        }
    }

    /// Builds the profile for a federated identity signing in for the first
    /// time. The provider has already verified the address.
    pub fn from_identity(identity: &AuthIdentity) -> Self {
        Self {
            fullname: identity
                .display_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string()),
            avatar: identity
                .photo_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            banner: DEFAULT_BANNER.to_string(),
            email: identity.email.clone(),
            address: String::new(),
            basket: Vec::new(),
            mobile: Mobile::default(),
            role: Role::User,
            email_verified: true,
            date_joined: identity.creation_time.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Capitalizes the first letter of each space-separated word.
///
/// Empty segments from repeated spaces are preserved so the word count and
/// spacing of the input do not change.
pub fn normalize_fullname(fullname: &str) -> String {
    fullname
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
