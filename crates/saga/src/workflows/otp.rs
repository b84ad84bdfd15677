use domain::validate_otp;
use serde_json::{Map, Value};
use session::{AuthStatus, StatusKind, StoreEvent};

use crate::coordinator::{RunContext, WorkflowCoordinator};
use crate::error::{Result, WorkflowError};
use crate::services::ui::Route;
use crate::steps::*;
use crate::workflows::{EMAIL_VERIFIED_MESSAGE, OTP_RESENT_MESSAGE, USER_NOT_FOUND_MESSAGE};

impl WorkflowCoordinator {
    /// Verifies the code, marks the user's email verified and returns to
    /// sign-in. A malformed code is rejected before calling the service.
    #[tracing::instrument(skip(self, ctx, otp))]
    pub(crate) async fn verify_otp(&self, ctx: &RunContext, email: &str, otp: &str) -> Result<()> {
        ctx.step(STEP_VALIDATE_OTP, async { validate_otp(otp) })
            .await?;
        ctx.step(STEP_VERIFY_OTP, self.otp.verify(email, otp)).await?;

        let (user_id, _) = ctx
            .step(STEP_FIND_USER, async {
                self.gateway
                    .find_user_by_email(email)
                    .await?
                    .ok_or_else(|| WorkflowError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()))
            })
            .await?;

        let mut fields = Map::new();
        fields.insert("emailVerified".to_string(), Value::Bool(true));
        ctx.step(STEP_MARK_VERIFIED, self.gateway.update_user(&user_id, fields))
            .await?;
        tracing::info!(%user_id, "email verified");

        self.store
            .dispatch_all([
                StoreEvent::SetAuthStatus(Some(AuthStatus::notice(
                    StatusKind::Otp,
                    EMAIL_VERIFIED_MESSAGE,
                ))),
                StoreEvent::SetAuthenticating(false),
            ])
            .await;
        ctx.local(STEP_NAVIGATE).await;
        self.ui.navigate(Route::SignIn);
        Ok(())
    }

    #[tracing::instrument(skip(self, ctx))]
    pub(crate) async fn resend_otp(&self, ctx: &RunContext, email: &str) -> Result<()> {
        ctx.step(STEP_SEND_OTP, self.otp.send(email)).await?;

        self.store
            .dispatch_all([
                StoreEvent::SetAuthStatus(Some(AuthStatus::notice(
                    StatusKind::Otp,
                    OTP_RESENT_MESSAGE,
                ))),
                StoreEvent::SetAuthenticating(false),
            ])
            .await;
        Ok(())
    }
}
