//! Workflow coordinator: runs one workflow per dispatched intent.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use gateway::BackendGateway;
use session::{AuthStatus, SessionStore, StatusKind, StoreEvent};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{Result, WorkflowError};
use crate::events::WorkflowEvent;
use crate::intent::{Intent, WorkflowKind};
use crate::journal::WorkflowJournal;
use crate::run::WorkflowRun;
use crate::services::otp::OtpService;
use crate::services::ui::{ToastLevel, UiEffects};

pub(crate) const CHECKOUT_FAILED_MESSAGE: &str = "Failed to place order. Please try again.";

/// Journals the steps of one run.
pub(crate) struct RunContext {
    run_id: Uuid,
    journal: WorkflowJournal,
}

impl RunContext {
    pub(crate) async fn record(&self, event: WorkflowEvent) {
        self.journal.append(self.run_id, event).await;
    }

    /// Runs a step that ends the workflow when it fails.
    pub(crate) async fn step<T, E>(
        &self,
        name: &'static str,
        fut: impl Future<Output = std::result::Result<T, E>>,
    ) -> Result<T>
    where
        E: Into<WorkflowError>,
    {
        tracing::debug!(step = name, "workflow step started");
        self.record(WorkflowEvent::step_started(name)).await;
        match fut.await {
            Ok(value) => {
                self.record(WorkflowEvent::step_completed(name)).await;
                Ok(value)
            }
            Err(e) => {
                let err = e.into();
                tracing::warn!(step = name, error = %err, "workflow step failed");
                self.record(WorkflowEvent::step_failed(name, err.to_string()))
                    .await;
                Err(err)
            }
        }
    }

    /// Runs a step whose failure is logged and otherwise ignored.
    pub(crate) async fn tolerate<T, E>(
        &self,
        name: &'static str,
        fut: impl Future<Output = std::result::Result<T, E>>,
    ) -> Option<T>
    where
        E: Display,
    {
        self.record(WorkflowEvent::step_started(name)).await;
        match fut.await {
            Ok(value) => {
                self.record(WorkflowEvent::step_completed(name)).await;
                Some(value)
            }
            Err(e) => {
                tracing::error!(step = name, error = %e, "workflow step failed, continuing");
                self.record(WorkflowEvent::step_skipped(name, e.to_string()))
                    .await;
                None
            }
        }
    }

    /// Records a step that only touches local state and cannot fail.
    pub(crate) async fn local(&self, name: &'static str) {
        self.record(WorkflowEvent::step_started(name)).await;
        self.record(WorkflowEvent::step_completed(name)).await;
    }
}

/// A workflow running on its own task.
pub struct WorkflowHandle {
    cancel: CancellationToken,
    join: JoinHandle<WorkflowRun>,
}

impl WorkflowHandle {
    /// Asks the workflow to stop at its next suspension point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the workflow to finish.
    pub async fn wait(self) -> std::result::Result<WorkflowRun, JoinError> {
        self.join.await
    }
}

/// Orchestrates the auth and checkout workflows.
///
/// Each intent starts exactly one workflow. Steps call the backend gateway,
/// the OTP service and the view layer, and every outcome is written to the
/// session store. Every run is journaled and can be inspected afterwards.
///
/// Workflows of the same class are not serialized: two runs dispatched
/// concurrently interleave at their suspension points and the last status
/// write wins.
#[derive(Clone)]
pub struct WorkflowCoordinator {
    pub(crate) gateway: BackendGateway,
    pub(crate) otp: Arc<dyn OtpService>,
    pub(crate) ui: Arc<dyn UiEffects>,
    pub(crate) store: SessionStore,
    journal: WorkflowJournal,
}

impl WorkflowCoordinator {
    pub fn new(
        gateway: BackendGateway,
        otp: Arc<dyn OtpService>,
        ui: Arc<dyn UiEffects>,
        store: SessionStore,
    ) -> Self {
        Self {
            gateway,
            otp,
            ui,
            store,
            journal: WorkflowJournal::new(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn journal(&self) -> &WorkflowJournal {
        &self.journal
    }

    /// Runs the workflow for an intent to completion.
    pub async fn dispatch(&self, intent: Intent) -> WorkflowRun {
        self.run(intent, CancellationToken::new()).await
    }

    /// Runs the workflow for an intent on a new task.
    pub fn spawn(&self, intent: Intent) -> WorkflowHandle {
        let cancel = CancellationToken::new();
        let coordinator = self.clone();
        let token = cancel.clone();
        let join = tokio::spawn(async move { coordinator.run(intent, token).await });
        WorkflowHandle { cancel, join }
    }

    /// Runs the workflow for an intent until it finishes or `cancel` fires.
    ///
    /// Failures are reported to the user by the workflow's error handler and
    /// recorded in the returned run; they are not returned as errors.
    #[tracing::instrument(skip_all, fields(workflow = %intent.kind()))]
    pub async fn run(&self, intent: Intent, cancel: CancellationToken) -> WorkflowRun {
        let kind = intent.kind();
        metrics::counter!("workflow_executions_total", "workflow" => kind.as_str()).increment(1);
        let started = std::time::Instant::now();

        let ctx = RunContext {
            run_id: Uuid::new_v4(),
            journal: self.journal.clone(),
        };
        ctx.record(WorkflowEvent::workflow_started(ctx.run_id, kind))
            .await;

        if kind.tracks_in_flight() {
            self.store.dispatch(StoreEvent::SetAuthenticating(true)).await;
        }
        if kind.clears_status() {
            self.store.dispatch(StoreEvent::SetAuthStatus(None)).await;
        }

        // Dropping the workflow future stops it at its current suspension point
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(WorkflowError::Cancelled),
            result = self.execute(&ctx, intent) => result,
        };

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("workflow_duration_seconds", "workflow" => kind.as_str())
            .record(duration);

        match outcome {
            Ok(()) => {
                ctx.record(WorkflowEvent::workflow_completed()).await;
                metrics::counter!("workflow_completed", "workflow" => kind.as_str()).increment(1);
                tracing::info!(run_id = %ctx.run_id, duration, "workflow completed");
            }
            Err(WorkflowError::Cancelled) => {
                if kind.tracks_in_flight() {
                    self.store.dispatch(StoreEvent::SetAuthenticating(false)).await;
                }
                ctx.record(WorkflowEvent::workflow_cancelled()).await;
                metrics::counter!("workflow_cancelled", "workflow" => kind.as_str()).increment(1);
                tracing::info!(run_id = %ctx.run_id, "workflow cancelled");
            }
            Err(err) => {
                self.report_failure(kind, &err).await;
                ctx.record(WorkflowEvent::workflow_failed(err.user_message()))
                    .await;
                metrics::counter!(
                    "workflow_failed",
                    "workflow" => kind.as_str(),
                    "error" => err.kind()
                )
                .increment(1);
                tracing::warn!(run_id = %ctx.run_id, error = %err, "workflow failed");
            }
        }

        self.journal.get_run(ctx.run_id).await.unwrap_or_default()
    }

    async fn execute(&self, ctx: &RunContext, intent: Intent) -> Result<()> {
        match intent {
            Intent::SignIn { email, password } => self.sign_in(ctx, &email, &password).await,
            Intent::SignInWithProvider { provider } => {
                self.sign_in_with_provider(ctx, provider).await
            }
            Intent::SignUp {
                fullname,
                email,
                password,
            } => self.sign_up(ctx, &fullname, &email, &password).await,
            Intent::SignOut => {
                self.sign_out(ctx).await;
                Ok(())
            }
            Intent::ResetPassword { email } => self.password_reset(ctx, &email).await,
            Intent::AuthStateChanged(identity) => self.hydrate(ctx, identity).await,
            Intent::AuthStateFailed => {
                self.auth_state_failed().await;
                Ok(())
            }
            Intent::SetAuthPersistence => {
                self.set_auth_persistence(ctx).await;
                Ok(())
            }
            Intent::VerifyOtp { email, otp } => self.verify_otp(ctx, &email, &otp).await,
            Intent::ResendOtp { email } => self.resend_otp(ctx, &email).await,
            Intent::CheckoutConfirm { payment } => self.checkout_confirm(ctx, payment).await,
        }
    }

    /// Surfaces a failure to the user and clears the in-flight flag.
    async fn report_failure(&self, kind: WorkflowKind, err: &WorkflowError) {
        match kind {
            WorkflowKind::SignIn
            | WorkflowKind::SignInWithProvider
            | WorkflowKind::SignUp
            | WorkflowKind::SessionHydration
            | WorkflowKind::PasswordReset => {
                self.store
                    .dispatch(StoreEvent::SetAuthStatus(Some(AuthStatus::error(
                        StatusKind::Auth,
                        err.user_message(),
                    ))))
                    .await;
            }
            WorkflowKind::VerifyOtp | WorkflowKind::ResendOtp => {
                self.store
                    .dispatch(StoreEvent::SetAuthStatus(Some(AuthStatus::error(
                        StatusKind::Otp,
                        err.user_message(),
                    ))))
                    .await;
            }
            WorkflowKind::CheckoutConfirm => {
                self.ui.toast(CHECKOUT_FAILED_MESSAGE, ToastLevel::Error);
            }
            WorkflowKind::SignOut
            | WorkflowKind::AuthStateFailed
            | WorkflowKind::SetAuthPersistence => {}
        }

        if kind.tracks_in_flight() {
            self.store.dispatch(StoreEvent::SetAuthenticating(false)).await;
        }
    }
}
