use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::ValidatedJson;
use std::sync::Arc;

use crate::error::UserResult;
use crate::models::{CreateUser, EmailAvailability, User};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(replace_user).delete(delete_user))
        .route("/email-exists/{email}", get(email_exists))
        .with_state(shared_service)
}

/// GET /
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<Vec<User>>> {
    let users = service.list_users().await?;
    Ok(Json(users))
}

/// POST /
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /{id}
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<i32>,
) -> UserResult<Json<User>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// PUT /{id}
///
/// The body is the full record including the `version` last read.
async fn replace_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<i32>,
    ValidatedJson(user): ValidatedJson<User>,
) -> UserResult<StatusCode> {
    service.replace_user(id, user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /{id}
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<i32>,
) -> UserResult<StatusCode> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /email-exists/{email}
async fn email_exists<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(email): Path<String>,
) -> UserResult<Json<EmailAvailability>> {
    let availability = service.email_exists(&email).await?;
    Ok(Json(availability))
}
