use domain::{AuthIdentity, User};
use session::{AuthStatus, Session, StatusKind, StoreEvent};

use crate::coordinator::{RunContext, WorkflowCoordinator};
use crate::error::Result;
use crate::services::ui::Route;
use crate::steps::*;
use crate::workflows::{SIGNED_IN_MESSAGE, VERIFY_EMAIL_MESSAGE};

impl WorkflowCoordinator {
    /// Turns a signed-in identity into a session.
    ///
    /// A user whose email is unverified never gets a session: the identity
    /// is signed out again and sent to the verification screen.
    #[tracing::instrument(skip_all, fields(uid = %identity.uid, provider = %identity.provider_id))]
    pub(crate) async fn hydrate(&self, ctx: &RunContext, identity: AuthIdentity) -> Result<()> {
        let stored = ctx
            .step(STEP_LOAD_USER, self.gateway.get_user(&identity.uid))
            .await?;

        match stored {
            Some(user) if !user.email_verified => {
                ctx.tolerate(STEP_RESEND_OTP, self.otp.send(&user.email))
                    .await;
                ctx.tolerate(STEP_FORCE_SIGN_OUT, self.gateway.sign_out())
                    .await;
                self.store.dispatch(StoreEvent::SignOutSuccess).await;

                ctx.local(STEP_NAVIGATE).await;
                self.ui.navigate(Route::VerifyOtp {
                    email: user.email.clone(),
                });
                self.store
                    .dispatch_all([
                        StoreEvent::SetAuthStatus(Some(AuthStatus::error(
                            StatusKind::Auth,
                            VERIFY_EMAIL_MESSAGE,
                        ))),
                        StoreEvent::SetAuthenticating(false),
                    ])
                    .await;
                tracing::info!("email not verified, redirected to verification");
                return Ok(());
            }
            Some(user) => {
                ctx.local(STEP_SET_SESSION).await;
                let basket = user.basket.clone();
                self.establish_session(&identity, user, Some(basket)).await;
            }
            None if !identity.provider_id.is_password() => {
                let user = User::from_identity(&identity);
                ctx.step(
                    STEP_CREATE_USER_RECORD,
                    self.gateway.add_user(&identity.uid, &user),
                )
                .await?;
                ctx.local(STEP_SET_SESSION).await;
                self.establish_session(&identity, user, None).await;
            }
            None => {
                // Password accounts always get a record at sign-up
                tracing::warn!("no user record for password identity");
            }
        }

        self.store
            .dispatch_all([
                StoreEvent::SetAuthStatus(Some(AuthStatus::success(
                    StatusKind::Auth,
                    SIGNED_IN_MESSAGE,
                ))),
                StoreEvent::SetAuthenticating(false),
            ])
            .await;
        Ok(())
    }

    async fn establish_session(
        &self,
        identity: &AuthIdentity,
        user: User,
        basket: Option<Vec<domain::BasketItem>>,
    ) {
        let session = Session {
            id: identity.uid.clone(),
            role: user.role,
            provider: identity.provider_id,
        };
        self.store.dispatch(StoreEvent::SetProfile(user)).await;
        if let Some(items) = basket {
            self.store.dispatch(StoreEvent::SetBasketItems(items)).await;
        }
        self.store.dispatch(StoreEvent::SignInSuccess(session)).await;
    }
}
