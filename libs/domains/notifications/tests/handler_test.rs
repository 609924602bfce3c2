//! Handler tests for the notifications domain
//!
//! Drive `POST /send-mail` against the in-memory provider.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use domain_notifications::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(provider: MockEmailProvider) -> Router {
    let service = NotificationService::new(provider, MailerConfig::default()).unwrap();
    handlers::router(service)
}

fn send_mail(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/send-mail")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_send_mail_returns_200_with_empty_body() {
    let provider = MockEmailProvider::new();
    let data = TestDataBuilder::from_test_name("send_mail_ok");
    let email = data.email("otp");
    let otp = data.otp();

    let response = app(provider.clone())
        .oneshot(send_mail(json!({ "email": email, "otp": otp })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let sent = provider.sent_emails().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, email);
    assert!(sent[0].html_body.contains(&otp));
}

#[tokio::test]
async fn test_send_mail_rejects_short_otp() {
    let provider = MockEmailProvider::new();

    let response = app(provider.clone())
        .oneshot(send_mail(json!({ "email": "x@y.com", "otp": "12345" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(body.error, "VALIDATION_ERROR");
    assert!(body.details.is_some());
    assert_eq!(provider.sent_count().await, 0);
}

#[tokio::test]
async fn test_send_mail_rejects_missing_fields() {
    let response = app(MockEmailProvider::new())
        .oneshot(send_mail(json!({ "email": "x@y.com" })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_send_mail_dispatch_failure_is_500_with_detail() {
    let response = app(MockEmailProvider::failing("connection refused"))
        .oneshot(send_mail(json!({ "email": "x@y.com", "otp": "482913" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(
        body.message,
        "An error occurred while sending the email. Error Details: connection refused"
    );
}
