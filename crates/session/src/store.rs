//! Shared, observable session store.

use std::sync::Arc;

use domain::BasketItem;
use tokio::sync::{RwLock, broadcast};

use crate::events::StoreEvent;
use crate::state::{AppState, AuthStatus, Session};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Process-wide state container.
///
/// Cloning yields another handle to the same state. Events are applied one
/// at a time under the write lock and then published to subscribers in the
/// same order.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<AppState>>,
    events: broadcast::Sender<StoreEvent>,
}

impl SessionStore {
    /// Creates a store holding the default (signed-out) state.
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    /// Creates a store seeded with the given state.
    pub fn with_state(state: AppState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(state)),
            events,
        }
    }

    /// Applies an event and notifies subscribers.
    pub async fn dispatch(&self, event: StoreEvent) {
        let mut state = self.state.write().await;
        tracing::debug!(event = event.event_type(), "applying store event");
        state.apply(event.clone());
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    /// Applies several events in order.
    pub async fn dispatch_all(&self, events: impl IntoIterator<Item = StoreEvent>) {
        for event in events {
            self.dispatch(event).await;
        }
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// Receives every event applied after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.read().await.session.clone()
    }

    pub async fn basket(&self) -> Vec<BasketItem> {
        self.state.read().await.basket.clone()
    }

    pub async fn auth_status(&self) -> Option<AuthStatus> {
        self.state.read().await.auth_status.clone()
    }

    pub async fn is_authenticating(&self) -> bool {
        self.state.read().await.is_authenticating
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
