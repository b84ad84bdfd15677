//! Workflow bodies, one module per area.
//!
//! Each workflow is an `impl WorkflowCoordinator` method that runs its steps
//! in order through the run context. Returning an error hands control to the
//! coordinator's failure handler.

mod auth;
mod checkout;
mod hydration;
mod otp;

pub(crate) const SIGNED_IN_MESSAGE: &str = "Successfully signed in. Redirecting...";
pub(crate) const VERIFY_EMAIL_MESSAGE: &str = "Please verify your email. We have sent you a new OTP.";
pub(crate) const RESET_SENT_MESSAGE: &str =
    "Password reset email has been sent to your provided email.";
pub(crate) const EMAIL_VERIFIED_MESSAGE: &str = "Email verified successfully. Please login.";
pub(crate) const OTP_RESENT_MESSAGE: &str = "OTP has been resent to your email";
pub(crate) const ORDER_PLACED_MESSAGE: &str = "Order placed successfully! (Demo)";
pub(crate) const USER_NOT_FOUND_MESSAGE: &str = "User not found";
