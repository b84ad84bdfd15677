//! Workflow run state machine.

use serde::{Deserialize, Serialize};

/// The state of a workflow run in its lifecycle.
///
/// State transitions:
/// ```text
/// NotStarted ──► Running ──┬──► Completed
///                          ├──► Failed
///                          └──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WorkflowState {
    #[default]
    NotStarted,

    /// Steps are being executed.
    Running,

    /// Every step succeeded (terminal state).
    Completed,

    /// A step failed and the error was reported (terminal state).
    Failed,

    /// The run's cancellation token fired (terminal state).
    Cancelled,
}

impl WorkflowState {
    /// Returns true if the run can begin.
    pub fn can_run(&self) -> bool {
        matches!(self, WorkflowState::NotStarted)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Completed | WorkflowState::Failed | WorkflowState::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::NotStarted => "NotStarted",
            WorkflowState::Running => "Running",
            WorkflowState::Completed => "Completed",
            WorkflowState::Failed => "Failed",
            WorkflowState::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
