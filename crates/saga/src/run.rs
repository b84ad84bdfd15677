//! Workflow run rebuilt from its journal.

use uuid::Uuid;

use crate::events::WorkflowEvent;
use crate::intent::WorkflowKind;
use crate::state::WorkflowState;

/// One execution of a workflow.
#[derive(Debug, Clone, Default)]
pub struct WorkflowRun {
    id: Option<Uuid>,
    kind: Option<WorkflowKind>,
    state: WorkflowState,
    current_step: usize,
    completed_steps: Vec<String>,
    skipped_steps: Vec<String>,
    failed_step: Option<String>,
    failure_reason: Option<String>,
}

impl WorkflowRun {
    /// Rebuilds a run by applying its events in order.
    pub fn from_events(events: impl IntoIterator<Item = WorkflowEvent>) -> Self {
        let mut run = Self::default();
        for event in events {
            run.apply(event);
        }
        run
    }

    pub fn apply(&mut self, event: WorkflowEvent) {
        match event {
            WorkflowEvent::WorkflowStarted(data) => {
                if !self.state.can_run() {
                    tracing::warn!(
                        run_id = %data.run_id,
                        state = %self.state,
                        "ignoring repeated workflow start"
                    );
                    return;
                }
                self.id = Some(data.run_id);
                self.kind = Some(data.kind);
                self.state = WorkflowState::Running;
            }
            WorkflowEvent::StepStarted(_) => {
                self.current_step += 1;
            }
            WorkflowEvent::StepCompleted(data) => {
                self.completed_steps.push(data.step_name);
            }
            WorkflowEvent::StepFailed(data) => {
                self.failed_step = Some(data.step_name);
                self.failure_reason = Some(data.error);
            }
            WorkflowEvent::StepSkipped(data) => {
                self.skipped_steps.push(data.step_name);
            }
            WorkflowEvent::WorkflowCompleted(_) => {
                self.state = WorkflowState::Completed;
            }
            WorkflowEvent::WorkflowFailed(data) => {
                self.state = WorkflowState::Failed;
                self.failure_reason = Some(data.reason);
            }
            WorkflowEvent::WorkflowCancelled(_) => {
                self.state = WorkflowState::Cancelled;
            }
        }
    }
}

// Query methods
impl WorkflowRun {
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn kind(&self) -> Option<WorkflowKind> {
        self.kind
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Number of steps that were started.
    pub fn steps_started(&self) -> usize {
        self.current_step
    }

    pub fn completed_steps(&self) -> &[String] {
        &self.completed_steps
    }

    /// Steps whose failure was logged and tolerated.
    pub fn skipped_steps(&self) -> &[String] {
        &self.skipped_steps
    }

    pub fn failed_step(&self) -> Option<&str> {
        self.failed_step.as_deref()
    }

    /// The user-facing reason the run failed, if it did.
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_run() {
        let run_id = Uuid::new_v4();
        let run = WorkflowRun::from_events([
            WorkflowEvent::workflow_started(run_id, WorkflowKind::SignUp),
            WorkflowEvent::step_started("create_account"),
            WorkflowEvent::step_completed("create_account"),
            WorkflowEvent::step_started("write_user_record"),
            WorkflowEvent::step_completed("write_user_record"),
            WorkflowEvent::workflow_completed(),
        ]);

        assert_eq!(run.id(), Some(run_id));
        assert_eq!(run.kind(), Some(WorkflowKind::SignUp));
        assert_eq!(run.state(), WorkflowState::Completed);
        assert_eq!(run.steps_started(), 2);
        assert_eq!(run.completed_steps(), &["create_account", "write_user_record"]);
        assert!(run.failure_reason().is_none());
    }

    #[test]
    fn test_failed_run() {
        let run = WorkflowRun::from_events([
            WorkflowEvent::workflow_started(Uuid::new_v4(), WorkflowKind::SignIn),
            WorkflowEvent::step_started("sign_in"),
            WorkflowEvent::step_failed("sign_in", "invalid credentials"),
            WorkflowEvent::workflow_failed("Incorrect email or password"),
        ]);

        assert_eq!(run.state(), WorkflowState::Failed);
        assert_eq!(run.failed_step(), Some("sign_in"));
        assert_eq!(run.failure_reason(), Some("Incorrect email or password"));
        assert!(run.completed_steps().is_empty());
    }

    #[test]
    fn test_skipped_step_does_not_fail_run() {
        let run = WorkflowRun::from_events([
            WorkflowEvent::workflow_started(Uuid::new_v4(), WorkflowKind::SignOut),
            WorkflowEvent::step_started("sign_out"),
            WorkflowEvent::step_skipped("sign_out", "offline"),
            WorkflowEvent::step_started("clear_state"),
            WorkflowEvent::step_completed("clear_state"),
            WorkflowEvent::workflow_completed(),
        ]);

        assert_eq!(run.state(), WorkflowState::Completed);
        assert_eq!(run.skipped_steps(), &["sign_out"]);
        assert_eq!(run.completed_steps(), &["clear_state"]);
    }

    #[test]
    fn test_repeated_start_is_ignored() {
        let first = Uuid::new_v4();
        let run = WorkflowRun::from_events([
            WorkflowEvent::workflow_started(first, WorkflowKind::SignIn),
            WorkflowEvent::step_started("sign_in"),
            WorkflowEvent::step_completed("sign_in"),
            WorkflowEvent::workflow_completed(),
            WorkflowEvent::workflow_started(Uuid::new_v4(), WorkflowKind::SignOut),
        ]);

        assert_eq!(run.id(), Some(first));
        assert_eq!(run.kind(), Some(WorkflowKind::SignIn));
        assert_eq!(run.state(), WorkflowState::Completed);
    }

    #[test]
    fn test_empty_run() {
        let run = WorkflowRun::default();
        assert!(run.id().is_none());
        assert_eq!(run.state(), WorkflowState::NotStarted);
    }
}
