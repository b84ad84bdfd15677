use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Payment method selected on the final checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Credit,
    #[default]
    Paypal,
}

/// Payment form values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cardnumber: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub ccv: String,
    #[serde(rename = "type", default)]
    pub payment_type: PaymentType,
}

impl PaymentDetails {
    pub fn paypal() -> Self {
        Self::default()
    }

    pub fn credit(
        name: impl Into<String>,
        cardnumber: impl Into<String>,
        expiry: impl Into<String>,
        ccv: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cardnumber: cardnumber.into(),
            expiry: expiry.into(),
            ccv: ccv.into(),
            payment_type: PaymentType::Credit,
        }
    }

    /// Validates the fields required by the selected payment type.
    ///
    /// PayPal needs nothing; a credit card needs a holder name of at least
    /// four characters, a 13-19 character card number, an expiry and a
    /// 3-4 character CCV.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.payment_type != PaymentType::Credit {
            return Ok(());
        }

        let invalid = |msg: &str| Err(DomainError::InvalidPayment(msg.to_string()));

        if self.name.trim().is_empty() {
            return invalid("Name is required");
        }
        if self.name.chars().count() < 4 {
            return invalid("Name should be at least 4 characters.");
        }
        if self.cardnumber.is_empty() {
            return invalid("Card number is required");
        }
        if !(13..=19).contains(&self.cardnumber.chars().count()) {
            return invalid("Card number should be 13-19 digits long");
        }
        if self.expiry.trim().is_empty() {
            return invalid("Credit card expiry is required");
        }
        if self.ccv.is_empty() {
            return invalid("CCV is required");
        }
        if !(3..=4).contains(&self.ccv.chars().count()) {
            return invalid("CCV length should be 3-4 digit");
        }
        Ok(())
    }
}
