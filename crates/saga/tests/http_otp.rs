//! Tests for the HTTP OTP client against a local server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use gateway::{BackendGateway, InMemoryAuthProvider, InMemoryDocumentStore, InMemoryFileStore};
use saga::{HttpOtpService, Intent, OtpError, OtpService, RecordingUi, WorkflowCoordinator};
use serde_json::{Value, json};
use session::{SessionStore, StatusKind};

const VALID_CODE: &str = "123456";

struct TestServer {
    url: String,
    _handle: tokio::task::JoinHandle<()>,
}

async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        url,
        _handle: handle,
    }
}

async fn send(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some(email) if email.starts_with("broken") => {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Some(email) if email.starts_with("limited") => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "message": "Too many requests, slow down" })),
        )
            .into_response(),
        Some(_) => Json(json!({ "message": "OTP sent" })).into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn verify(Json(body): Json<Value>) -> Response {
    if body["otp"] == VALID_CODE {
        Json(json!({ "message": "OTP verified" })).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "OTP has expired" })),
        )
            .into_response()
    }
}

fn otp_router() -> Router {
    Router::new()
        .route("/api/otp/send", post(send))
        .route("/api/otp/verify", post(verify))
}

fn client(url: &str) -> HttpOtpService {
    HttpOtpService::new(format!("{url}/"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_send_and_verify_success() {
    let server = spawn_test_server(otp_router()).await;
    let otp = client(&server.url);

    otp.send("jane@example.com").await.unwrap();
    otp.verify("jane@example.com", VALID_CODE).await.unwrap();
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let server = spawn_test_server(otp_router()).await;
    let otp = client(&server.url);

    let err = otp.verify("jane@example.com", "000000").await.unwrap_err();
    assert!(matches!(err, OtpError::Api { status: 400, .. }));
    assert_eq!(err.to_string(), "OTP has expired");

    let err = otp.send("limited@example.com").await.unwrap_err();
    assert!(matches!(err, OtpError::Api { status: 429, .. }));
    assert_eq!(err.to_string(), "Too many requests, slow down");
}

#[tokio::test]
async fn test_missing_body_falls_back_to_default_message() {
    let server = spawn_test_server(otp_router()).await;
    let otp = client(&server.url);

    let err = otp.send("broken@example.com").await.unwrap_err();
    assert!(matches!(err, OtpError::Api { status: 500, .. }));
    assert_eq!(err.to_string(), "Failed to resend OTP");
}

#[tokio::test]
async fn test_unreachable_service() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let otp = client(&format!("http://{addr}"));
    let err = otp.send("jane@example.com").await.unwrap_err();
    assert!(matches!(err, OtpError::Http(_)));
}

fn coordinator(otp: HttpOtpService) -> (WorkflowCoordinator, SessionStore, RecordingUi) {
    let gateway = BackendGateway::new(
        Arc::new(InMemoryAuthProvider::new()),
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(InMemoryFileStore::new()),
    );
    let store = SessionStore::new();
    let ui = RecordingUi::new();
    let coordinator =
        WorkflowCoordinator::new(gateway, Arc::new(otp), Arc::new(ui.clone()), store.clone());
    (coordinator, store, ui)
}

#[tokio::test]
async fn test_rejected_code_keeps_user_on_verification_screen() {
    let server = spawn_test_server(otp_router()).await;
    let (coordinator, store, ui) = coordinator(client(&server.url));

    coordinator
        .dispatch(Intent::VerifyOtp {
            email: "jane@example.com".to_string(),
            otp: "000000".to_string(),
        })
        .await;

    let state = store.snapshot().await;
    assert!(!state.is_authenticating);
    let status = state.auth_status.unwrap();
    assert!(status.is_error);
    assert_eq!(status.kind, StatusKind::Otp);
    assert_eq!(status.message, "OTP has expired");
    assert!(ui.navigations().is_empty());
}

#[tokio::test]
async fn test_unreachable_service_shows_network_message() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed = listener.local_addr().unwrap();
    drop(listener);

    let (coordinator, store, _ui) = coordinator(client(&format!("http://{closed}")));
    coordinator
        .dispatch(Intent::ResendOtp {
            email: "jane@example.com".to_string(),
        })
        .await;

    let status = store.auth_status().await.unwrap();
    assert!(status.is_error);
    assert_eq!(status.message, "Network error has occured. Please try again.");
}
