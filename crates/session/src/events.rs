//! Events applied to the session store.

use common::ProductId;
use domain::{BasketItem, PaymentDetails, Shipping, User};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, AuthStatus, CheckoutState, FilterState, Session};

/// Every change the store accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StoreEvent {
    /// Marks an auth or checkout workflow as in flight (or not).
    SetAuthenticating(bool),

    /// Replaces the status message; `None` clears it.
    SetAuthStatus(Option<AuthStatus>),

    SignInSuccess(Session),
    SignOutSuccess,

    SetProfile(User),
    ClearProfile,

    /// Replaces the basket contents.
    SetBasketItems(Vec<BasketItem>),
    /// Adds an item unless one with the same product key is present.
    AddToBasket(BasketItem),
    RemoveFromBasket(ProductId),
    ClearBasket,

    SetShippingDetails(Shipping),
    SetPaymentDetails(PaymentDetails),
    ResetCheckout,

    ApplyFilter(FilterState),
    ResetFilter,
}

impl StoreEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::SetAuthenticating(_) => "SetAuthenticating",
            StoreEvent::SetAuthStatus(_) => "SetAuthStatus",
            StoreEvent::SignInSuccess(_) => "SignInSuccess",
            StoreEvent::SignOutSuccess => "SignOutSuccess",
            StoreEvent::SetProfile(_) => "SetProfile",
            StoreEvent::ClearProfile => "ClearProfile",
            StoreEvent::SetBasketItems(_) => "SetBasketItems",
            StoreEvent::AddToBasket(_) => "AddToBasket",
            StoreEvent::RemoveFromBasket(_) => "RemoveFromBasket",
            StoreEvent::ClearBasket => "ClearBasket",
            StoreEvent::SetShippingDetails(_) => "SetShippingDetails",
            StoreEvent::SetPaymentDetails(_) => "SetPaymentDetails",
            StoreEvent::ResetCheckout => "ResetCheckout",
            StoreEvent::ApplyFilter(_) => "ApplyFilter",
            StoreEvent::ResetFilter => "ResetFilter",
        }
    }
}

impl AppState {
    /// Applies one event. Every field an event carries replaces the old
    /// value outright.
    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::SetAuthenticating(flag) => {
                self.is_authenticating = flag;
            }
            StoreEvent::SetAuthStatus(status) => {
                self.auth_status = status;
            }
            StoreEvent::SignInSuccess(session) => {
                self.session = Some(session);
            }
            StoreEvent::SignOutSuccess => {
                self.session = None;
            }
            StoreEvent::SetProfile(user) => {
                self.profile = Some(user);
            }
            StoreEvent::ClearProfile => {
                self.profile = None;
            }
            StoreEvent::SetBasketItems(items) => {
                self.basket = items;
            }
            StoreEvent::AddToBasket(item) => {
                if !self.basket.iter().any(|existing| existing.id == item.id) {
                    self.basket.insert(0, item);
                }
            }
            StoreEvent::RemoveFromBasket(id) => {
                self.basket.retain(|item| item.id != id);
            }
            StoreEvent::ClearBasket => {
                self.basket.clear();
            }
            StoreEvent::SetShippingDetails(shipping) => {
                self.checkout.shipping = shipping;
            }
            StoreEvent::SetPaymentDetails(payment) => {
                self.checkout.payment = payment;
            }
            StoreEvent::ResetCheckout => {
                self.checkout = CheckoutState::default();
            }
            StoreEvent::ApplyFilter(filter) => {
                self.filter = filter;
            }
            StoreEvent::ResetFilter => {
                self.filter = FilterState::default();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StatusKind;
    use common::UserId;
    use domain::{ProviderId, Role, Timestamp};

    fn item(id: &str) -> BasketItem {
        BasketItem::new(id, id, 10.0, 1)
    }

    #[test]
    fn test_status_is_replaced_not_merged() {
        let mut state = AppState::default();
        state.apply(StoreEvent::SetAuthStatus(Some(AuthStatus::error(
            StatusKind::Auth,
            "Incorrect email or password",
        ))));
        state.apply(StoreEvent::SetAuthStatus(Some(AuthStatus::notice(
            StatusKind::Otp,
            "OTP has been resent to your email",
        ))));

        let status = state.auth_status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Otp);
        assert!(!status.is_error);

        state.apply(StoreEvent::SetAuthStatus(None));
        assert!(state.auth_status.is_none());
    }

    #[test]
    fn test_basket_events() {
        let mut state = AppState::default();
        state.apply(StoreEvent::AddToBasket(item("a")));
        state.apply(StoreEvent::AddToBasket(item("b")));
        state.apply(StoreEvent::AddToBasket(item("a")));
        let ids: Vec<_> = state.basket.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        state.apply(StoreEvent::RemoveFromBasket(ProductId::new("b")));
        assert_eq!(state.basket.len(), 1);

        state.apply(StoreEvent::SetBasketItems(vec![item("x"), item("y")]));
        assert_eq!(state.basket.len(), 2);

        state.apply(StoreEvent::ClearBasket);
        assert!(state.basket.is_empty());
    }

    #[test]
    fn test_session_and_profile() {
        let mut state = AppState::default();
        state.apply(StoreEvent::SetProfile(User::registration(
            "jane",
            "jane@example.com",
            Timestamp::Millis(0),
        )));
        state.apply(StoreEvent::SignInSuccess(Session {
            id: UserId::new("u1"),
            role: Role::User,
            provider: ProviderId::Password,
        }));
        assert!(state.is_signed_in());

        state.apply(StoreEvent::ClearProfile);
        state.apply(StoreEvent::SignOutSuccess);
        assert!(!state.is_signed_in());
        assert!(state.profile.is_none());
    }

    #[test]
    fn test_checkout_and_filter_reset() {
        let mut state = AppState::default();
        state.apply(StoreEvent::SetShippingDetails(Shipping {
            is_done: true,
            ..Default::default()
        }));
        state.apply(StoreEvent::SetPaymentDetails(PaymentDetails::credit(
            "Jane Doe",
            "4111111111111111",
            "12/30",
            "123",
        )));
        state.apply(StoreEvent::ApplyFilter(FilterState {
            brand: "acme".to_string(),
            ..Default::default()
        }));
        assert!(!state.is_signed_out_clean());

        state.apply(StoreEvent::ResetCheckout);
        state.apply(StoreEvent::ResetFilter);
        assert_eq!(state.checkout, CheckoutState::default());
        assert_eq!(state.filter, FilterState::default());
    }

    #[test]
    fn test_event_serialization() {
        let event = StoreEvent::SetAuthenticating(true);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SetAuthenticating");
        assert_eq!(json["data"], true);

        let unit: StoreEvent = serde_json::from_str(r#"{"type":"ClearBasket"}"#).unwrap();
        assert_eq!(unit, StoreEvent::ClearBasket);
        assert_eq!(unit.event_type(), "ClearBasket");
    }
}
