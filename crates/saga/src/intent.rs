//! Intents dispatched by views and the workflows they start.

use domain::{AuthIdentity, PaymentDetails, Provider};
use serde::{Deserialize, Serialize};

/// A user or platform intent. Exactly one workflow runs per intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Intent {
    SignIn {
        email: String,
        password: String,
    },
    SignInWithProvider {
        provider: Provider,
    },
    SignUp {
        fullname: String,
        email: String,
        password: String,
    },
    SignOut,
    ResetPassword {
        email: String,
    },
    /// The identity provider reported a signed-in identity.
    AuthStateChanged(AuthIdentity),
    /// The identity provider reported that nobody is signed in.
    AuthStateFailed,
    SetAuthPersistence,
    VerifyOtp {
        email: String,
        otp: String,
    },
    ResendOtp {
        email: String,
    },
    /// Places the order. Without a payment selection the one stored in the
    /// checkout state is used.
    CheckoutConfirm {
        #[serde(default)]
        payment: Option<PaymentDetails>,
    },
}

impl Intent {
    /// The workflow this intent starts.
    pub fn kind(&self) -> WorkflowKind {
        match self {
            Intent::SignIn { .. } => WorkflowKind::SignIn,
            Intent::SignInWithProvider { .. } => WorkflowKind::SignInWithProvider,
            Intent::SignUp { .. } => WorkflowKind::SignUp,
            Intent::SignOut => WorkflowKind::SignOut,
            Intent::ResetPassword { .. } => WorkflowKind::PasswordReset,
            Intent::AuthStateChanged(_) => WorkflowKind::SessionHydration,
            Intent::AuthStateFailed => WorkflowKind::AuthStateFailed,
            Intent::SetAuthPersistence => WorkflowKind::SetAuthPersistence,
            Intent::VerifyOtp { .. } => WorkflowKind::VerifyOtp,
            Intent::ResendOtp { .. } => WorkflowKind::ResendOtp,
            Intent::CheckoutConfirm { .. } => WorkflowKind::CheckoutConfirm,
        }
    }
}

/// Workflow classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowKind {
    SignIn,
    SignInWithProvider,
    SignUp,
    SessionHydration,
    SignOut,
    PasswordReset,
    VerifyOtp,
    ResendOtp,
    CheckoutConfirm,
    AuthStateFailed,
    SetAuthPersistence,
}

impl WorkflowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowKind::SignIn => "SignIn",
            WorkflowKind::SignInWithProvider => "SignInWithProvider",
            WorkflowKind::SignUp => "SignUp",
            WorkflowKind::SessionHydration => "SessionHydration",
            WorkflowKind::SignOut => "SignOut",
            WorkflowKind::PasswordReset => "PasswordReset",
            WorkflowKind::VerifyOtp => "VerifyOtp",
            WorkflowKind::ResendOtp => "ResendOtp",
            WorkflowKind::CheckoutConfirm => "CheckoutConfirm",
            WorkflowKind::AuthStateFailed => "AuthStateFailed",
            WorkflowKind::SetAuthPersistence => "SetAuthPersistence",
        }
    }

    /// Whether the workflow holds the in-flight flag while it runs.
    pub fn tracks_in_flight(&self) -> bool {
        !matches!(
            self,
            WorkflowKind::AuthStateFailed | WorkflowKind::SetAuthPersistence
        )
    }

    /// Whether the workflow starts by clearing the status message.
    pub fn clears_status(&self) -> bool {
        self.tracks_in_flight()
            && !matches!(
                self,
                WorkflowKind::SessionHydration | WorkflowKind::CheckoutConfirm
            )
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
