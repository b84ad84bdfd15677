//! Auth and checkout workflow pipeline.
//!
//! Views dispatch an `Intent`; the `WorkflowCoordinator` runs the matching
//! workflow step by step against the backend gateway and the OTP service,
//! writes every outcome to the session store and triggers navigation.
//!
//! Workflows:
//! - Sign in (password or federated provider), then session hydration
//! - Sign up: create account, write the user record, request an OTP
//! - Session hydration, which never exposes an unverified user
//! - Sign out, password reset, OTP verification and resend
//! - Checkout confirmation
//!
//! Every run is journaled as a sequence of `WorkflowEvent`s and can be
//! cancelled through its `CancellationToken`.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod intent;
pub mod journal;
pub mod run;
pub mod services;
pub mod state;
pub mod steps;
mod workflows;

pub use coordinator::{WorkflowCoordinator, WorkflowHandle};
pub use error::{Result, WorkflowError};
pub use events::WorkflowEvent;
pub use intent::{Intent, WorkflowKind};
pub use journal::WorkflowJournal;
pub use run::WorkflowRun;
pub use services::{
    HttpOtpService, InMemoryOtpService, OtpError, OtpService, RecordingUi, Route, ToastLevel,
    UiEffect, UiEffects,
};
pub use state::WorkflowState;
