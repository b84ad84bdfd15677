//! Navigation and toast side effects.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Routes the pipeline navigates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Home,
    SignIn,
    /// The verification screen, pre-filled with the email to verify.
    VerifyOtp { email: String },
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::SignIn => "/signin",
            Route::VerifyOtp { .. } => "/verify-otp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastLevel {
    Success,
    Error,
}

/// The view layer as seen from the workflows.
pub trait UiEffects: Send + Sync {
    fn navigate(&self, route: Route);

    fn toast(&self, message: &str, level: ToastLevel);
}

/// A side effect captured by `RecordingUi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    Navigate(Route),
    Toast { message: String, level: ToastLevel },
}

/// Records every side effect for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingUi {
    effects: Arc<Mutex<Vec<UiEffect>>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<UiEffect> {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn navigations(&self) -> Vec<Route> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                UiEffect::Navigate(route) => Some(route),
                UiEffect::Toast { .. } => None,
            })
            .collect()
    }

    pub fn toasts(&self) -> Vec<(String, ToastLevel)> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                UiEffect::Toast { message, level } => Some((message, level)),
                UiEffect::Navigate(_) => None,
            })
            .collect()
    }

    fn record(&self, effect: UiEffect) {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(effect);
    }
}

impl UiEffects for RecordingUi {
    fn navigate(&self, route: Route) {
        self.record(UiEffect::Navigate(route));
    }

    fn toast(&self, message: &str, level: ToastLevel) {
        self.record(UiEffect::Toast {
            message: message.to_string(),
            level,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording() {
        let ui = RecordingUi::new();
        ui.navigate(Route::VerifyOtp {
            email: "a@b.c".to_string(),
        });
        ui.toast("done", ToastLevel::Success);

        assert_eq!(ui.effects().len(), 2);
        assert_eq!(ui.navigations()[0].path(), "/verify-otp");
        assert_eq!(ui.toasts(), vec![("done".to_string(), ToastLevel::Success)]);
    }
}
