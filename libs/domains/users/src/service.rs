use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, EmailAvailability, NewUser, User, UserPredicate};
use crate::repository::UserRepository;

/// Facade over the user store
///
/// Translates store outcomes into [`UserError`] kinds. Conflicts are never
/// retried here; the caller decides.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// The only operation that reports `StoreUnavailable`; every other one
    /// folds it into `Internal`.
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    pub async fn get_user(&self, id: i32) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(internal_fault)?
            .ok_or(UserError::NotFound(id))
    }

    /// Create a user; the classification tag is always [`crate::models::DEFAULT_USER_TYPE`]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::InvalidArgument(e.to_string()))?;

        let user = self
            .repository
            .insert(NewUser::from(input))
            .await
            .map_err(internal_fault)?;

        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    /// Full-record replace guarded by `user.version`
    ///
    /// A lost race is re-checked against the store: if the record is gone the
    /// result is `NotFound`, otherwise the conflict is returned as is.
    pub async fn replace_user(&self, id: i32, user: User) -> UserResult<()> {
        if id != user.id {
            return Err(UserError::InvalidArgument(
                "Invalid ID in the request.".to_string(),
            ));
        }

        user.validate()
            .map_err(|e| UserError::InvalidArgument(e.to_string()))?;

        match self.repository.update(user).await {
            Ok(updated) => {
                tracing::info!(user_id = id, version = updated.version, "Replaced user");
                Ok(())
            }
            Err(UserError::ConcurrencyConflict(_)) => {
                let still_exists = self
                    .repository
                    .exists(UserPredicate::Id(id))
                    .await
                    .map_err(|e| match internal_fault(e) {
                        UserError::Internal(detail) => UserError::Internal(detail),
                        other => UserError::Internal(other.to_string()),
                    })?;

                if still_exists {
                    tracing::warn!(user_id = id, "Replace lost a concurrent write");
                    Err(UserError::ConcurrencyConflict(id))
                } else {
                    Err(UserError::NotFound(id))
                }
            }
            Err(e) => Err(internal_fault(e)),
        }
    }

    pub async fn delete_user(&self, id: i32) -> UserResult<()> {
        if self
            .repository
            .find_by_id(id)
            .await
            .map_err(internal_fault)?
            .is_none()
        {
            return Err(UserError::NotFound(id));
        }

        // A concurrent delete may win between the lookup and the removal.
        if !self.repository.delete(id).await.map_err(internal_fault)? {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }

    /// Advisory only: not atomic with a later create
    pub async fn email_exists(&self, email: &str) -> UserResult<EmailAvailability> {
        let exists = self
            .repository
            .exists(UserPredicate::Email(email.to_string()))
            .await
            .map_err(internal_fault)?;

        Ok(EmailAvailability::new(exists))
    }
}

/// Outside of listing, an unreachable store is an unclassified fault.
fn internal_fault(err: UserError) -> UserError {
    match err {
        UserError::StoreUnavailable(detail) => UserError::Internal(detail),
        other => other,
    }
}
