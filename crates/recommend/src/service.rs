//! Clients for the recommendation scoring endpoint.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use common::ProductId;
use domain::Product;
use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};

/// Scores the catalog against a user's purchase history.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(&self, products: &[Product], user_history: &[ProductId])
    -> Result<Vec<Product>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendRequest<'a> {
    products: &'a [Product],
    user_history: &'a [ProductId],
}

#[derive(Deserialize)]
struct RecommendResponse {
    #[serde(default)]
    recommended: Vec<Product>,
}

/// HTTP client for `POST {base}/api/recommend`.
#[derive(Clone)]
pub struct HttpRecommendationService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecommendationService {
    /// Creates a client for the endpoint at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationService {
    #[tracing::instrument(skip_all, fields(products = products.len(), history = user_history.len()))]
    async fn recommend(
        &self,
        products: &[Product],
        user_history: &[ProductId],
    ) -> Result<Vec<Product>> {
        let url = format!("{}/api/recommend", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RecommendRequest {
                products,
                user_history,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecommendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: RecommendResponse = response.json().await?;
        Ok(body.recommended)
    }
}

#[derive(Debug, Default)]
struct InMemoryRecommendationState {
    requests: Vec<Vec<ProductId>>,
    fail: bool,
    latency: Option<Duration>,
}

/// In-memory scorer for testing.
///
/// Recommends catalog products the user has not bought yet, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecommendationService {
    state: Arc<Mutex<InMemoryRecommendationState>>,
}

impl InMemoryRecommendationService {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryRecommendationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configures every request to be rejected with a server error.
    pub fn set_fail(&self, fail: bool) {
        self.state().fail = fail;
    }

    /// Delays every response by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = Some(latency);
    }

    /// The purchase history sent with each request, in order.
    pub fn requests(&self) -> Vec<Vec<ProductId>> {
        self.state().requests.clone()
    }
}

#[async_trait]
impl RecommendationService for InMemoryRecommendationService {
    async fn recommend(
        &self,
        products: &[Product],
        user_history: &[ProductId],
    ) -> Result<Vec<Product>> {
        let (fail, latency) = {
            let mut state = self.state();
            state.requests.push(user_history.to_vec());
            (state.fail, state.latency)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if fail {
            return Err(RecommendError::Api {
                status: 500,
                message: "scoring failed".to_string(),
            });
        }

        let bought: HashSet<&ProductId> = user_history.iter().collect();
        Ok(products
            .iter()
            .filter(|product| !bought.contains(&product.id))
            .cloned()
            .collect())
    }
}
