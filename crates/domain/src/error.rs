//! Domain error types.

use thiserror::Error;

/// Errors raised while validating domain inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The basket has no items to order.
    #[error("Your basket is empty")]
    EmptyBasket,

    /// Shipping details were not completed before payment.
    #[error("Shipping details are incomplete")]
    ShippingIncomplete,

    /// A payment field failed validation.
    #[error("{0}")]
    InvalidPayment(String),

    /// The one-time code is not six digits.
    #[error("OTP must be 6 digits")]
    InvalidOtp,
}
