//! Backend gateway for the storefront client.
//!
//! A single façade (`BackendGateway`) over three injected capabilities:
//! - `AuthProvider`: the external identity service
//! - `DocumentStore`: the document database holding `users`, `products`
//!   and `orders`
//! - `FileStore`: object storage for product images
//!
//! In-memory implementations of each capability are provided for tests and
//! local runs.

pub mod analytics;
pub mod auth;
pub mod error;
pub mod files;
pub mod gateway;
pub mod memory;
pub mod query;
pub mod store;

pub use analytics::{AdminAnalytics, AdminStats, MonthlyRevenue, MonthlyUsers};
pub use auth::{AuthProvider, InMemoryAuthProvider, Persistence};
pub use error::{AuthErrorCode, GatewayError, Result};
pub use files::{FileStore, InMemoryFileStore};
pub use gateway::{
    BackendGateway, GatewayConfig, ORDERS, PRODUCTS, ProductPage, SearchResult, USERS, merge_by_id,
};
pub use memory::InMemoryDocumentStore;
pub use query::{Direction, DocumentQuery, Filter};
pub use store::{Document, DocumentStore};
