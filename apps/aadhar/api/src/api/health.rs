//! Readiness handler with real database and email transport checks.

use crate::state::AppState;
use axum::{extract::State, response::Response};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health;

/// Readiness check endpoint.
///
/// Pings PostgreSQL when the users domain is backed by it (the in-memory
/// store is always ready) and asks the email transport whether it can send.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = Vec::new();

    if let Some(db) = &state.db {
        checks.push((
            "database",
            Box::pin(async move {
                check_health(db)
                    .await
                    .map_err(|e| format!("Database ping failed: {}", e))
            }),
        ));
    }

    let email = &state.email;
    checks.push((
        "email",
        Box::pin(async move {
            match email.health_check().await {
                Ok(true) => Ok(()),
                Ok(false) => Err(format!("{} transport is not ready", email.name())),
                Err(e) => Err(e.to_string()),
            }
        }),
    ));

    run_health_checks(checks).await
}
