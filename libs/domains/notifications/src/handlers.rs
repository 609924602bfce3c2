use axum::{Router, extract::State, http::StatusCode, routing::post};
use axum_helpers::ValidatedJson;
use std::sync::Arc;

use crate::error::NotificationResult;
use crate::models::VerificationRequest;
use crate::providers::EmailProvider;
use crate::service::NotificationService;

/// Create the notifications router
pub fn router<P: EmailProvider + 'static>(service: NotificationService<P>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/send-mail", post(send_mail))
        .with_state(shared_service)
}

/// POST /send-mail
async fn send_mail<P: EmailProvider>(
    State(service): State<Arc<NotificationService<P>>>,
    ValidatedJson(request): ValidatedJson<VerificationRequest>,
) -> NotificationResult<StatusCode> {
    service.send_verification_email(request).await?;
    Ok(StatusCode::OK)
}
