//! Workflow journal events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::WorkflowKind;

/// Events recorded while a workflow runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WorkflowEvent {
    WorkflowStarted(WorkflowStartedData),
    StepStarted(StepData),
    StepCompleted(StepData),
    StepFailed(StepFailedData),
    /// A failure that was logged and did not stop the workflow.
    StepSkipped(StepFailedData),
    WorkflowCompleted(WorkflowFinishedData),
    WorkflowFailed(WorkflowFailedData),
    WorkflowCancelled(WorkflowFinishedData),
}

impl WorkflowEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            WorkflowEvent::WorkflowStarted(_) => "WorkflowStarted",
            WorkflowEvent::StepStarted(_) => "StepStarted",
            WorkflowEvent::StepCompleted(_) => "StepCompleted",
            WorkflowEvent::StepFailed(_) => "StepFailed",
            WorkflowEvent::StepSkipped(_) => "StepSkipped",
            WorkflowEvent::WorkflowCompleted(_) => "WorkflowCompleted",
            WorkflowEvent::WorkflowFailed(_) => "WorkflowFailed",
            WorkflowEvent::WorkflowCancelled(_) => "WorkflowCancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStartedData {
    pub run_id: Uuid,
    pub kind: WorkflowKind,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepData {
    pub step_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepFailedData {
    pub step_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowFinishedData {
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowFailedData {
    /// The message shown to the user.
    pub reason: String,
    pub failed_at: DateTime<Utc>,
}

// Convenience constructors
impl WorkflowEvent {
    pub fn workflow_started(run_id: Uuid, kind: WorkflowKind) -> Self {
        WorkflowEvent::WorkflowStarted(WorkflowStartedData {
            run_id,
            kind,
            started_at: Utc::now(),
        })
    }

    pub fn step_started(step_name: impl Into<String>) -> Self {
        WorkflowEvent::StepStarted(StepData {
            step_name: step_name.into(),
        })
    }

    pub fn step_completed(step_name: impl Into<String>) -> Self {
        WorkflowEvent::StepCompleted(StepData {
            step_name: step_name.into(),
        })
    }

    pub fn step_failed(step_name: impl Into<String>, error: impl Into<String>) -> Self {
        WorkflowEvent::StepFailed(StepFailedData {
            step_name: step_name.into(),
            error: error.into(),
        })
    }

    pub fn step_skipped(step_name: impl Into<String>, error: impl Into<String>) -> Self {
        WorkflowEvent::StepSkipped(StepFailedData {
            step_name: step_name.into(),
            error: error.into(),
        })
    }

    pub fn workflow_completed() -> Self {
        WorkflowEvent::WorkflowCompleted(WorkflowFinishedData {
            finished_at: Utc::now(),
        })
    }

    pub fn workflow_failed(reason: impl Into<String>) -> Self {
        WorkflowEvent::WorkflowFailed(WorkflowFailedData {
            reason: reason.into(),
            failed_at: Utc::now(),
        })
    }

    pub fn workflow_cancelled() -> Self {
        WorkflowEvent::WorkflowCancelled(WorkflowFinishedData {
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        assert_eq!(
            WorkflowEvent::workflow_started(Uuid::new_v4(), WorkflowKind::SignIn).event_type(),
            "WorkflowStarted"
        );
        assert_eq!(WorkflowEvent::step_started("x").event_type(), "StepStarted");
        assert_eq!(WorkflowEvent::step_completed("x").event_type(), "StepCompleted");
        assert_eq!(WorkflowEvent::step_failed("x", "e").event_type(), "StepFailed");
        assert_eq!(WorkflowEvent::step_skipped("x", "e").event_type(), "StepSkipped");
        assert_eq!(
            WorkflowEvent::workflow_completed().event_type(),
            "WorkflowCompleted"
        );
        assert_eq!(
            WorkflowEvent::workflow_failed("e").event_type(),
            "WorkflowFailed"
        );
        assert_eq!(
            WorkflowEvent::workflow_cancelled().event_type(),
            "WorkflowCancelled"
        );
    }

    #[test]
    fn test_serialization_shape() {
        let event = WorkflowEvent::step_failed("sign_in", "invalid credentials");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StepFailed");
        assert_eq!(json["data"]["step_name"], "sign_in");

        let back: WorkflowEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.event_type(), "StepFailed");
    }
}
