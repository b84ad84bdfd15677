//! Storefront composition root.
//!
//! Wires the backend gateway, the workflow coordinator, the session store
//! and the recommendation loader together, and executes driver
//! [`Command`]s against them.

pub mod command;
pub mod config;
pub mod error;
pub mod routes;
pub mod ui;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use gateway::{BackendGateway, InMemoryAuthProvider, InMemoryDocumentStore, InMemoryFileStore};
use metrics_exporter_prometheus::PrometheusHandle;
use recommend::{HttpRecommendationService, RecommendationLoader, RecommendationService};
use saga::{HttpOtpService, OtpService, WorkflowCoordinator};
use serde_json::{Value, json};
use session::SessionStore;
use tower_http::trace::TraceLayer;

pub use command::{Command, run_summary};
pub use config::{Config, LogFormat};
pub use error::{AppError, Result};
pub use ui::LoggingUi;

/// The storefront client with every collaborator wired in.
pub struct Storefront {
    gateway: BackendGateway,
    coordinator: WorkflowCoordinator,
    recommendations: RecommendationLoader,
    store: SessionStore,
    ui: LoggingUi,
}

impl Storefront {
    /// Builds a storefront over the in-memory backend, talking to the OTP
    /// and recommendation endpoints at `config.backend_api`.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client fails to build.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway = BackendGateway::with_config(
            Arc::new(InMemoryAuthProvider::new()),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryFileStore::new()),
            config.gateway_config(),
        );
        let otp = HttpOtpService::new(&config.backend_api, config.request_timeout)?;
        let recommender =
            HttpRecommendationService::new(&config.backend_api, config.request_timeout)?;
        Ok(Self::new(gateway, Arc::new(otp), Arc::new(recommender)))
    }

    pub fn new(
        gateway: BackendGateway,
        otp: Arc<dyn OtpService>,
        recommender: Arc<dyn RecommendationService>,
    ) -> Self {
        let store = SessionStore::new();
        let ui = LoggingUi::new();
        let coordinator =
            WorkflowCoordinator::new(gateway.clone(), otp, Arc::new(ui.clone()), store.clone());
        let recommendations = RecommendationLoader::new(gateway.clone(), recommender, store.clone());

        Self {
            gateway,
            coordinator,
            recommendations,
            store,
            ui,
        }
    }

    pub fn gateway(&self) -> &BackendGateway {
        &self.gateway
    }

    pub fn coordinator(&self) -> &WorkflowCoordinator {
        &self.coordinator
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn ui(&self) -> &LoggingUi {
        &self.ui
    }

    /// Executes one command and returns its result as JSON.
    #[tracing::instrument(skip_all, fields(command = command.name()))]
    pub async fn execute(&self, command: Command) -> Result<Value> {
        metrics::counter!("driver_commands_total", "command" => command.name()).increment(1);
        match command {
            Command::Dispatch(intent) => {
                let run = self.coordinator.dispatch(intent).await;
                Ok(run_summary(&run))
            }
            Command::Apply(event) => {
                let event_type = event.event_type();
                self.store.dispatch(event).await;
                Ok(json!({ "applied": event_type }))
            }
            Command::AddProduct(product) => {
                self.gateway.add_product(&product.id, &product).await?;
                Ok(json!({ "id": product.id }))
            }
            Command::Products { cursor } => {
                let page = self.gateway.get_products(cursor.as_ref()).await?;
                Ok(json!({
                    "products": page.products,
                    "nextCursor": page.next_cursor,
                    "total": page.total,
                }))
            }
            Command::Search { term } => {
                let result = self.gateway.search_products(&term).await?;
                Ok(json!({ "products": result.products, "cursor": result.cursor }))
            }
            Command::Recommend => {
                self.recommendations.on_mount().await;
                Ok(serde_json::to_value(self.recommendations.state().await)?)
            }
            Command::RetryRecommend => {
                self.recommendations.retry().await;
                Ok(serde_json::to_value(self.recommendations.state().await)?)
            }
            Command::State => Ok(json!({
                "route": self.ui.current_route().path(),
                "state": serde_json::to_value(self.store.snapshot().await)?,
            })),
        }
    }
}

/// Creates the operational router: health, state and Prometheus metrics.
pub fn create_ops_router(storefront: Arc<Storefront>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/state", get(routes::health::state))
        .with_state(storefront)
        .merge(metrics_router)
        .layer(TraceLayer::new_for_http())
}
