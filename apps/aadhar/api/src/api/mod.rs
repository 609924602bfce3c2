use axum::{Router, routing::get};

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Both domain routers arrive with their state applied, so they merge under
/// one `/final-users` prefix.
pub fn routes(users: Router, notifications: Router) -> Router {
    Router::new().nest("/final-users", users.merge(notifications))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EmailTransport, Environment, UserStore};
    use crate::state::AppState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig};
    use domain_notifications::{
        EmailProvider, MailerConfig, MockEmailProvider, NotificationService, SmtpConfig,
    };
    use domain_users::{InMemoryUserRepository, UserService};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt; // For oneshot()

    fn memory_config() -> Config {
        Config {
            app: app_info!(),
            environment: Environment::Development,
            server: ServerConfig::default(),
            user_store: UserStore::Memory,
            database: None,
            email_transport: EmailTransport::Log,
            smtp: SmtpConfig::new("localhost", 1025, "noreply@localhost"),
            mailer: MailerConfig::default(),
        }
    }

    fn app(provider: MockEmailProvider) -> Router {
        let users =
            domain_users::handlers::router(UserService::new(InMemoryUserRepository::new()));
        let service = NotificationService::new(provider, MailerConfig::default()).unwrap();
        let email: Arc<dyn EmailProvider> = service.provider();
        let notifications = domain_notifications::handlers::router(service);

        let config = memory_config();
        axum_helpers::create_router(routes(users, notifications), &config.server)
            .unwrap()
            .merge(axum_helpers::health_router(config.app))
            .merge(ready_router(AppState {
                config,
                db: None,
                email,
            }))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_users_and_send_mail_share_prefix() {
        let provider = MockEmailProvider::new();
        let app = app(provider.clone());

        let created = app
            .clone()
            .oneshot(post("/api/final-users", json!({ "email": "x@y.com" })))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let exists = app
            .clone()
            .oneshot(get_request("/api/final-users/email-exists/x@y.com"))
            .await
            .unwrap();
        assert_eq!(exists.status(), StatusCode::OK);
        assert_eq!(json_body(exists).await["exists"], json!(true));

        let sent = app
            .oneshot(post(
                "/api/final-users/send-mail",
                json!({ "email": "x@y.com", "otp": "482913" }),
            ))
            .await
            .unwrap();
        assert_eq!(sent.status(), StatusCode::OK);
        assert!(provider.was_sent_to("x@y.com").await);
    }

    #[tokio::test]
    async fn test_memory_store_is_ready() {
        let response = app(MockEmailProvider::new())
            .oneshot(get_request("/ready"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], json!("ready"));
        assert_eq!(body["email"], json!("connected"));
    }

    #[tokio::test]
    async fn test_unhealthy_email_transport_is_not_ready() {
        let response = app(MockEmailProvider::failing("relay down"))
            .oneshot(get_request("/ready"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["status"], json!("not ready"));
        assert_eq!(body["email"], json!("disconnected"));
    }

    #[tokio::test]
    async fn test_health_reports_app_name() {
        let response = app(MockEmailProvider::new())
            .oneshot(get_request("/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["name"], json!("aadhar_api"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app(MockEmailProvider::new())
            .oneshot(get_request("/api/nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], json!("NOT_FOUND"));
    }
}
