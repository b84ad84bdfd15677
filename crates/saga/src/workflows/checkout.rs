use domain::{Order, PaymentDetails};
use session::StoreEvent;

use crate::coordinator::{RunContext, WorkflowCoordinator};
use crate::error::Result;
use crate::services::ui::{Route, ToastLevel};
use crate::steps::*;
use crate::workflows::ORDER_PLACED_MESSAGE;

impl WorkflowCoordinator {
    /// Places an order for the current basket.
    ///
    /// The basket and checkout state are only cleared once the order is
    /// persisted, so a failed attempt can be retried as is.
    pub(crate) async fn checkout_confirm(
        &self,
        ctx: &RunContext,
        payment: Option<PaymentDetails>,
    ) -> Result<()> {
        let state = self.store.snapshot().await;
        let payment = payment.unwrap_or_else(|| state.checkout.payment.clone());
        let user_id = state.session.as_ref().map(|session| session.id.clone());

        let order = ctx
            .step(STEP_BUILD_ORDER, async {
                Order::from_checkout(user_id, &state.basket, &state.checkout.shipping, &payment)
            })
            .await?;
        let order_id = ctx
            .step(STEP_CREATE_ORDER, self.gateway.create_order(&order))
            .await?;
        tracing::info!(%order_id, total = order.total_amount, "order placed");

        self.store
            .dispatch_all([
                StoreEvent::ClearBasket,
                StoreEvent::ResetCheckout,
                StoreEvent::SetAuthenticating(false),
            ])
            .await;
        self.ui.toast(ORDER_PLACED_MESSAGE, ToastLevel::Success);
        ctx.local(STEP_NAVIGATE).await;
        self.ui.navigate(Route::Home);
        Ok(())
    }
}
