//! Identifier types shared by every storefront crate.

mod types;

pub use types::{OrderId, ProductId, UserId, generate_document_id};
