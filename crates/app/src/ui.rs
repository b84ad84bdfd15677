//! View-layer effects for the headless driver.

use std::sync::{Arc, Mutex, PoisonError};

use saga::{Route, ToastLevel, UiEffects};

/// Logs navigations and toasts and remembers the current route.
#[derive(Debug, Clone)]
pub struct LoggingUi {
    current: Arc<Mutex<Route>>,
}

impl LoggingUi {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Route::Home)),
        }
    }

    pub fn current_route(&self) -> Route {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for LoggingUi {
    fn default() -> Self {
        Self::new()
    }
}

impl UiEffects for LoggingUi {
    fn navigate(&self, route: Route) {
        tracing::info!(path = route.path(), "navigate");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = route;
    }

    fn toast(&self, message: &str, level: ToastLevel) {
        match level {
            ToastLevel::Success => tracing::info!(message, "toast"),
            ToastLevel::Error => tracing::warn!(message, "toast"),
        }
    }
}
