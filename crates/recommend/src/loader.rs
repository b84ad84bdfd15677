//! Recommended-products loader bound to a view's lifetime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::ProductId;
use domain::Product;
use gateway::BackendGateway;
use serde::{Deserialize, Serialize};
use session::SessionStore;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::service::RecommendationService;

/// Shown for every failed fetch, whatever the cause.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch recommended products";

/// What the recommendations view renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationState {
    pub products: Vec<Product>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Fetches recommendations for the signed-in user.
///
/// The loader is mounted on creation. Once [`unmount`](Self::unmount) is
/// called, fetches still in flight finish without touching the state.
#[derive(Clone)]
pub struct RecommendationLoader {
    gateway: BackendGateway,
    service: Arc<dyn RecommendationService>,
    store: SessionStore,
    state: Arc<RwLock<RecommendationState>>,
    mounted: Arc<AtomicBool>,
}

impl RecommendationLoader {
    pub fn new(
        gateway: BackendGateway,
        service: Arc<dyn RecommendationService>,
        store: SessionStore,
    ) -> Self {
        Self {
            gateway,
            service,
            store,
            state: Arc::new(RwLock::new(RecommendationState::default())),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Fetches once on first display; does nothing if results are present.
    pub async fn on_mount(&self) {
        if !self.is_mounted() || !self.state.read().await.products.is_empty() {
            return;
        }
        self.fetch().await;
    }

    /// Fetches again regardless of existing results.
    pub async fn retry(&self) {
        self.fetch().await;
    }

    /// Stops in-flight fetches from writing the state.
    ///
    /// The flag flips under the state lock, so no update lands after this
    /// returns.
    pub async fn unmount(&self) {
        let _state = self.state.write().await;
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub async fn state(&self) -> RecommendationState {
        self.state.read().await.clone()
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self) {
        self.update(|state| {
            state.is_loading = true;
            state.error = None;
        })
        .await;

        match self.load().await {
            Ok(products) => {
                metrics::counter!("recommendations_fetched_total").increment(1);
                tracing::info!(count = products.len(), "recommendations loaded");
                self.update(|state| {
                    state.products = products;
                    state.is_loading = false;
                })
                .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch recommendations");
                self.update(|state| {
                    state.error = Some(FETCH_ERROR_MESSAGE.to_string());
                    state.is_loading = false;
                })
                .await;
            }
        }
    }

    async fn load(&self) -> Result<Vec<Product>> {
        let products = self.gateway.get_all_products().await?;
        let history: Vec<ProductId> = match self.store.session().await {
            Some(session) => self.gateway.get_user_purchase_history(&session.id).await,
            None => Vec::new(),
        };
        self.service.recommend(&products, &history).await
    }

    /// Applies `f` to the state unless the view has been torn down.
    async fn update(&self, f: impl FnOnce(&mut RecommendationState)) {
        let mut state = self.state.write().await;
        if !self.is_mounted() {
            tracing::debug!("loader unmounted, dropping update");
            return;
        }
        f(&mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::InMemoryRecommendationService;
    use common::UserId;
    use domain::{ProviderId, Role};
    use gateway::{InMemoryAuthProvider, InMemoryDocumentStore, InMemoryFileStore};
    use session::{Session, StoreEvent};

    fn setup() -> (
        RecommendationLoader,
        BackendGateway,
        InMemoryRecommendationService,
        SessionStore,
    ) {
        let gateway = BackendGateway::new(
            Arc::new(InMemoryAuthProvider::new()),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryFileStore::new()),
        );
        let service = InMemoryRecommendationService::new();
        let store = SessionStore::new();
        let loader =
            RecommendationLoader::new(gateway.clone(), Arc::new(service.clone()), store.clone());
        (loader, gateway, service, store)
    }

    async fn seed(gateway: &BackendGateway, ids: &[&str]) {
        for id in ids {
            let product = Product::new(*id, format!("Product {id}"), 1.0);
            gateway.add_product(&product.id, &product).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_mount_fetches_without_session() {
        let (loader, gateway, service, _) = setup();
        seed(&gateway, &["p1", "p2"]).await;

        loader.on_mount().await;

        let state = loader.state().await;
        assert_eq!(state.products.len(), 2);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(service.requests(), vec![Vec::<ProductId>::new()]);
    }

    #[tokio::test]
    async fn test_mount_skips_when_results_present() {
        let (loader, gateway, service, _) = setup();
        seed(&gateway, &["p1"]).await;

        loader.on_mount().await;
        loader.on_mount().await;
        assert_eq!(service.requests().len(), 1);

        loader.retry().await;
        assert_eq!(service.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_sets_fixed_message() {
        let (loader, gateway, service, _) = setup();
        seed(&gateway, &["p1"]).await;
        service.set_fail(true);

        loader.on_mount().await;

        let state = loader.state().await;
        assert_eq!(state.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
        assert!(!state.is_loading);
        assert!(state.products.is_empty());

        // A successful retry clears the error
        service.set_fail(false);
        loader.retry().await;
        let state = loader.state().await;
        assert!(state.error.is_none());
        assert_eq!(state.products.len(), 1);
    }

    #[tokio::test]
    async fn test_signed_in_user_history_is_sent() {
        let (loader, gateway, service, store) = setup();
        seed(&gateway, &["p1", "p2"]).await;
        let order = domain::Order::from_checkout(
            Some(UserId::new("u1")),
            &[domain::BasketItem::new("p2", "Product p2", 1.0, 1)],
            &domain::Shipping {
                is_done: true,
                ..Default::default()
            },
            &domain::PaymentDetails::paypal(),
        )
        .unwrap();
        gateway.create_order(&order).await.unwrap();
        store
            .dispatch(StoreEvent::SignInSuccess(Session {
                id: UserId::new("u1"),
                role: Role::User,
                provider: ProviderId::Password,
            }))
            .await;

        loader.on_mount().await;

        assert_eq!(service.requests(), vec![vec![ProductId::new("p2")]]);
        let ids: Vec<_> = loader
            .state()
            .await
            .products
            .iter()
            .map(|p| p.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["p1"]);
    }

    #[tokio::test]
    async fn test_unmounted_loader_does_not_fetch() {
        let (loader, gateway, service, _) = setup();
        seed(&gateway, &["p1"]).await;
        loader.unmount().await;

        loader.on_mount().await;

        assert!(service.requests().is_empty());
        assert_eq!(loader.state().await, RecommendationState::default());
    }

    #[tokio::test]
    async fn test_update_waiting_on_lock_sees_unmount() {
        let (loader, _, _, _) = setup();
        let guard = loader.state.write().await;

        let pending = tokio::spawn({
            let loader = loader.clone();
            async move {
                loader
                    .update(|state| state.error = Some("late".to_string()))
                    .await
            }
        });
        tokio::task::yield_now().await;
        loader.mounted.store(false, Ordering::SeqCst);
        drop(guard);
        pending.await.unwrap();

        assert_eq!(loader.state().await, RecommendationState::default());
    }

    #[tokio::test]
    async fn test_unmount_waits_for_running_update() {
        let (loader, _, _, _) = setup();
        let guard = loader.state.write().await;

        let unmount = tokio::spawn({
            let loader = loader.clone();
            async move { loader.unmount().await }
        });
        tokio::task::yield_now().await;
        assert!(loader.is_mounted());

        drop(guard);
        unmount.await.unwrap();
        assert!(!loader.is_mounted());
    }
}
