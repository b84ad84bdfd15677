//! Domain layer for the storefront client.
//!
//! This crate provides the data model shared by the gateway, the session
//! store and the workflow pipeline:
//! - `User`, `Role` and the identity payloads issued by the identity provider
//! - `BasketItem` and basket arithmetic
//! - `Product` catalog documents
//! - Checkout inputs (`Shipping`, `PaymentDetails`) and the immutable `Order`
//! - `Timestamp`, which accepts every creation-time encoding the store emits

pub mod auth;
pub mod basket;
pub mod checkout;
pub mod error;
pub mod product;
pub mod timestamp;
pub mod user;

pub use auth::{AuthIdentity, OTP_LENGTH, Provider, ProviderId, validate_otp};
pub use basket::{BasketItem, basket_subtotal};
pub use checkout::{
    INTERNATIONAL_SHIPPING_FEE, Order, OrderPayment, PaymentDetails, PaymentType, Shipping,
    order_total,
};
pub use common::{OrderId, ProductId, UserId};
pub use error::DomainError;
pub use product::Product;
pub use timestamp::Timestamp;
pub use user::{DEFAULT_AVATAR, DEFAULT_BANNER, Mobile, Role, User, normalize_fullname};
