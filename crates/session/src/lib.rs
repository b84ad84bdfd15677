//! Session and status state store.
//!
//! `AppState` is the single source of truth read by views. It is only ever
//! changed by applying a `StoreEvent`, one reducer arm per event, and status
//! fields are replaced wholesale rather than merged.

pub mod events;
pub mod state;
pub mod store;

pub use events::StoreEvent;
pub use state::{AppState, AuthStatus, CheckoutState, FilterState, Session, StatusKind};
pub use store::SessionStore;
