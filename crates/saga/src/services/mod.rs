//! Collaborators the workflows call besides the backend gateway.

pub mod otp;
pub mod ui;

pub use otp::{HttpOtpService, InMemoryOtpService, OtpError, OtpService};
pub use ui::{RecordingUi, Route, ToastLevel, UiEffect, UiEffects};
