//! Checkout inputs and the order they produce.

mod order;
mod payment;
mod shipping;

pub use order::{INTERNATIONAL_SHIPPING_FEE, Order, OrderPayment, order_total};
pub use payment::{PaymentDetails, PaymentType};
pub use shipping::Shipping;
