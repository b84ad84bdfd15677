use common::UserId;
use serde::{Deserialize, Serialize};

use super::payment::{PaymentDetails, PaymentType};
use super::shipping::Shipping;
use crate::basket::{BasketItem, basket_subtotal};
use crate::error::DomainError;
use crate::timestamp::Timestamp;

/// Flat fee added to orders shipped internationally.
pub const INTERNATIONAL_SHIPPING_FEE: f64 = 50.0;

/// The payment summary stored on an order; card details are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayment {
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
}

/// An `orders/{id}` document. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub user_id: Option<UserId>,
    pub items: Vec<BasketItem>,
    pub shipping: Shipping,
    pub payment: OrderPayment,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Order {
    /// Builds an order from the current basket and checkout selections.
    ///
    /// The total is the basket subtotal plus the international shipping fee
    /// when applicable. `created_at` is left for the store to assign.
    pub fn from_checkout(
        user_id: Option<UserId>,
        basket: &[BasketItem],
        shipping: &Shipping,
        payment: &PaymentDetails,
    ) -> Result<Self, DomainError> {
        if basket.is_empty() {
            return Err(DomainError::EmptyBasket);
        }
        if !shipping.is_done {
            return Err(DomainError::ShippingIncomplete);
        }
        payment.validate()?;

        Ok(Self {
            user_id,
            items: basket.to_vec(),
            shipping: shipping.clone(),
            payment: OrderPayment {
                payment_type: payment.payment_type,
            },
            total_amount: order_total(basket, shipping),
            created_at: None,
        })
    }
}

/// Subtotal plus shipping fee.
pub fn order_total(basket: &[BasketItem], shipping: &Shipping) -> f64 {
    let fee = if shipping.is_international {
        INTERNATIONAL_SHIPPING_FEE
    } else {
        0.0
    };
    basket_subtotal(basket) + fee
}
