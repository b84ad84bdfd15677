//! Recommended products for the storefront.
//!
//! - [`RecommendationService`] posts the catalog and the user's purchase
//!   history to the scoring endpoint
//! - [`RecommendationLoader`] drives one fetch per view and stops updating
//!   once the view is gone

pub mod error;
pub mod loader;
pub mod service;

pub use error::{RecommendError, Result};
pub use loader::{FETCH_ERROR_MESSAGE, RecommendationLoader, RecommendationState};
pub use service::{
    HttpRecommendationService, InMemoryRecommendationService, RecommendationService,
};
