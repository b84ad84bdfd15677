//! Health and state inspection endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use session::AppState;

use crate::Storefront;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub workflow_runs: usize,
    pub signed_in: bool,
}

/// Liveness plus a short session summary.
pub async fn check(State(storefront): State<Arc<Storefront>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        workflow_runs: storefront.coordinator().journal().run_count().await,
        signed_in: storefront.store().session().await.is_some(),
    })
}

/// The current application state.
pub async fn state(State(storefront): State<Arc<Storefront>>) -> Json<AppState> {
    Json(storefront.store().snapshot().await)
}
