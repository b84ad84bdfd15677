use domain::{Provider, Timestamp, User};
use session::{AuthStatus, StatusKind, StoreEvent};

use crate::coordinator::{RunContext, WorkflowCoordinator};
use crate::error::{Result, WorkflowError};
use crate::services::ui::Route;
use crate::steps::*;
use crate::workflows::RESET_SENT_MESSAGE;

impl WorkflowCoordinator {
    /// Signs in with email and password, then hydrates the session.
    pub(crate) async fn sign_in(&self, ctx: &RunContext, email: &str, password: &str) -> Result<()> {
        let identity = ctx
            .step(STEP_SIGN_IN, self.gateway.sign_in(email, password))
            .await?;
        self.hydrate(ctx, identity).await
    }

    pub(crate) async fn sign_in_with_provider(
        &self,
        ctx: &RunContext,
        provider: Provider,
    ) -> Result<()> {
        let identity = ctx
            .step(STEP_SIGN_IN, self.gateway.sign_in_with_provider(provider))
            .await?;
        self.hydrate(ctx, identity).await
    }

    /// Creates the account and its user record, requests an OTP and sends
    /// the user to the verification screen.
    ///
    /// A failure after the account was created leaves the account in place.
    pub(crate) async fn sign_up(
        &self,
        ctx: &RunContext,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<()> {
        let identity = ctx
            .step(STEP_CREATE_ACCOUNT, self.gateway.create_account(email, password))
            .await?;

        let date_joined = identity
            .creation_time
            .clone()
            .unwrap_or_else(Timestamp::millis_now);
        let user = User::registration(fullname, email, date_joined);
        ctx.step(
            STEP_WRITE_USER_RECORD,
            self.gateway.add_user(&identity.uid, &user),
        )
        .await?;

        ctx.step(STEP_REQUEST_OTP, self.otp.send(email)).await?;

        self.store.dispatch(StoreEvent::SetAuthenticating(false)).await;
        ctx.local(STEP_NAVIGATE).await;
        self.ui.navigate(Route::VerifyOtp {
            email: email.to_string(),
        });
        Ok(())
    }

    /// Clears every piece of user-scoped state and returns to sign-in.
    ///
    /// A failed provider sign-out is logged; local state is cleared anyway.
    pub(crate) async fn sign_out(&self, ctx: &RunContext) {
        ctx.tolerate(STEP_SIGN_OUT, self.gateway.sign_out()).await;

        ctx.local(STEP_CLEAR_STATE).await;
        self.store
            .dispatch_all([
                StoreEvent::ClearBasket,
                StoreEvent::ClearProfile,
                StoreEvent::ResetFilter,
                StoreEvent::ResetCheckout,
                StoreEvent::SignOutSuccess,
                StoreEvent::SetAuthenticating(false),
            ])
            .await;

        ctx.local(STEP_NAVIGATE).await;
        self.ui.navigate(Route::SignIn);
    }

    /// Any failure is reported with the fixed reset-failure message.
    pub(crate) async fn password_reset(&self, ctx: &RunContext, email: &str) -> Result<()> {
        ctx.step(STEP_PASSWORD_RESET, async {
            self.gateway.password_reset(email).await.map_err(|e| {
                tracing::warn!(error = %e, "password reset request failed");
                WorkflowError::Reset
            })
        })
        .await?;

        self.store
            .dispatch_all([
                StoreEvent::SetAuthStatus(Some(AuthStatus::success(
                    StatusKind::Reset,
                    RESET_SENT_MESSAGE,
                ))),
                StoreEvent::SetAuthenticating(false),
            ])
            .await;
        Ok(())
    }

    /// The provider reported that nobody is signed in.
    pub(crate) async fn auth_state_failed(&self) {
        self.store
            .dispatch_all([StoreEvent::ClearProfile, StoreEvent::SignOutSuccess])
            .await;
    }

    /// Keeps the sign-in across restarts. Failures are logged only.
    pub(crate) async fn set_auth_persistence(&self, ctx: &RunContext) {
        ctx.tolerate(STEP_SET_PERSISTENCE, self.gateway.set_auth_persistence())
            .await;
    }
}
