//! Basket line items.

use common::ProductId;
use serde::{Deserialize, Serialize};

/// A product in the active cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl BasketItem {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Price times quantity.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Sum of line totals across the basket.
pub fn basket_subtotal(items: &[BasketItem]) -> f64 {
    items.iter().map(BasketItem::line_total).sum()
}
