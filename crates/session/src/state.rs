//! State held by the session store.

use common::UserId;
use domain::{BasketItem, PaymentDetails, ProviderId, Role, Shipping, User};
use serde::{Deserialize, Serialize};

/// The minimal authenticated identity held after a successful hydration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: UserId,
    pub role: Role,
    pub provider: ProviderId,
}

/// Which screen a status message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Auth,
    Reset,
    Otp,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Auth => "auth",
            StatusKind::Reset => "reset",
            StatusKind::Otp => "otp",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-facing status message.
///
/// Always replaced as a whole; there is no way to update one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: StatusKind,
    pub is_error: bool,
    pub message: String,
}

impl AuthStatus {
    pub fn success(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            success: true,
            kind,
            is_error: false,
            message: message.into(),
        }
    }

    pub fn error(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            kind,
            is_error: true,
            message: message.into(),
        }
    }

    /// An informational message that is neither a success nor an error.
    pub fn notice(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            kind,
            is_error: false,
            message: message.into(),
        }
    }
}

/// Catalog filter selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub recent: Vec<String>,
    pub keyword: String,
    pub brand: String,
    pub min_price: f64,
    pub max_price: f64,
    pub sort_by: String,
}

/// Checkout inputs collected across the checkout steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckoutState {
    pub shipping: Shipping,
    pub payment: PaymentDetails,
}

/// Everything the session store holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub session: Option<Session>,
    pub profile: Option<User>,
    pub basket: Vec<BasketItem>,
    pub filter: FilterState,
    pub checkout: CheckoutState,
    pub auth_status: Option<AuthStatus>,
    pub is_authenticating: bool,
}

impl AppState {
    /// True once a session has been established.
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// True when every piece of user-scoped state is back at its default.
    pub fn is_signed_out_clean(&self) -> bool {
        self.session.is_none()
            && self.profile.is_none()
            && self.basket.is_empty()
            && self.filter == FilterState::default()
            && self.checkout == CheckoutState::default()
    }
}
