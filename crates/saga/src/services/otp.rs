//! OTP service client.
//!
//! The OTP microservice exposes two endpoints:
//! - `POST {base}/api/otp/send` with `{email}`
//! - `POST {base}/api/otp/verify` with `{email, otp}`
//!
//! Error responses carry `{message}`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a failed verification response has no message.
pub const DEFAULT_VERIFY_ERROR: &str = "Invalid OTP";

/// Message used when a failed send response has no message.
pub const DEFAULT_SEND_ERROR: &str = "Failed to resend OTP";

/// Errors returned by the OTP service.
#[derive(Debug, Error)]
pub enum OtpError {
    /// The request did not complete.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
}

/// Sends and verifies one-time codes.
#[async_trait]
pub trait OtpService: Send + Sync {
    /// Issues a new code to the email address.
    async fn send(&self, email: &str) -> Result<(), OtpError>;

    /// Checks a code previously issued to the email address.
    async fn verify(&self, email: &str, otp: &str) -> Result<(), OtpError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the OTP microservice.
#[derive(Clone)]
pub struct HttpOtpService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOtpService {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, OtpError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        default_error: &str,
    ) -> Result<(), OtpError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // A body that is not the expected JSON falls back to the default
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| default_error.to_string());
        tracing::warn!(%url, status = status.as_u16(), %message, "OTP request rejected");

        Err(OtpError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl OtpService for HttpOtpService {
    #[tracing::instrument(skip(self))]
    async fn send(&self, email: &str) -> Result<(), OtpError> {
        self.post("/api/otp/send", &SendRequest { email }, DEFAULT_SEND_ERROR)
            .await
    }

    #[tracing::instrument(skip(self, otp))]
    async fn verify(&self, email: &str, otp: &str) -> Result<(), OtpError> {
        self.post(
            "/api/otp/verify",
            &VerifyRequest { email, otp },
            DEFAULT_VERIFY_ERROR,
        )
        .await
    }
}

#[derive(Debug, Default)]
struct InMemoryOtpState {
    codes: HashMap<String, String>,
    sent: Vec<String>,
    next_code: u32,
    fail_on_send: bool,
}

/// In-memory OTP service for testing.
///
/// Issued codes are sequential six-digit strings starting at `100000`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOtpService {
    state: Arc<Mutex<InMemoryOtpState>>,
}

impl InMemoryOtpService {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, InMemoryOtpState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configures sends to be rejected by the service.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state().fail_on_send = fail;
    }

    /// The code currently issued to the email, if any.
    pub fn code_for(&self, email: &str) -> Option<String> {
        self.state().codes.get(email).cloned()
    }

    /// Every email a code was sent to, in order.
    pub fn sent_to(&self) -> Vec<String> {
        self.state().sent.clone()
    }
}

#[async_trait]
impl OtpService for InMemoryOtpService {
    async fn send(&self, email: &str) -> Result<(), OtpError> {
        let mut state = self.state();
        if state.fail_on_send {
            return Err(OtpError::Api {
                status: 500,
                message: DEFAULT_SEND_ERROR.to_string(),
            });
        }

        let code = format!("{:06}", 100_000 + state.next_code);
        state.next_code += 1;
        state.codes.insert(email.to_string(), code);
        state.sent.push(email.to_string());
        Ok(())
    }

    async fn verify(&self, email: &str, otp: &str) -> Result<(), OtpError> {
        let mut state = self.state();
        match state.codes.get(email) {
            Some(code) if code == otp => {
                state.codes.remove(email);
                Ok(())
            }
            _ => Err(OtpError::Api {
                status: 400,
                message: DEFAULT_VERIFY_ERROR.to_string(),
            }),
        }
    }
}
