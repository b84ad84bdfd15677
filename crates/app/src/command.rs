//! Commands accepted by the line-oriented driver.

use common::ProductId;
use domain::Product;
use saga::{Intent, WorkflowRun};
use serde::Deserialize;
use serde_json::{Value, json};
use session::StoreEvent;

/// One line of driver input.
///
/// ```json
/// {"command": "dispatch", "args": {"type": "SignIn", "payload": {"email": "a@b.c", "password": "secret"}}}
/// {"command": "apply", "args": {"type": "AddToBasket", "data": {"id": "p1", "name": "Shirt", "price": 10.0, "quantity": 1}}}
/// {"command": "products", "args": {"cursor": "p11"}}
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    /// Runs the workflow for an intent.
    Dispatch(Intent),
    /// Applies a local state change such as a basket edit.
    Apply(StoreEvent),
    AddProduct(Product),
    Products {
        #[serde(default)]
        cursor: Option<ProductId>,
    },
    Search {
        term: String,
    },
    /// Loads recommendations unless already loaded.
    Recommend,
    RetryRecommend,
    State,
}

impl Command {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Dispatch(_) => "dispatch",
            Command::Apply(_) => "apply",
            Command::AddProduct(_) => "add_product",
            Command::Products { .. } => "products",
            Command::Search { .. } => "search",
            Command::Recommend => "recommend",
            Command::RetryRecommend => "retry_recommend",
            Command::State => "state",
        }
    }
}

/// Summary of a finished workflow run.
pub fn run_summary(run: &WorkflowRun) -> Value {
    json!({
        "workflow": run.kind().map(|kind| kind.as_str()),
        "state": run.state().as_str(),
        "completedSteps": run.completed_steps(),
        "skippedSteps": run.skipped_steps(),
        "failedStep": run.failed_step(),
        "reason": run.failure_reason(),
    })
}
