use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserPredicate};

/// Persistence port for users
///
/// One call is one store operation. Implementations never cache across calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users in store order (ascending id)
    async fn list(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>>;

    /// Insert; the store assigns `id` and sets `version` to 1
    async fn insert(&self, user: NewUser) -> UserResult<User>;

    /// Replace the row matching both `user.id` and `user.version`, bumping the
    /// version. No match is a [`UserError::ConcurrencyConflict`], whether the
    /// row is stale or gone.
    async fn update(&self, user: User) -> UserResult<User>;

    /// Returns `false` when nothing was removed
    async fn delete(&self, id: i32) -> UserResult<bool>;

    async fn exists(&self, predicate: UserPredicate) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    /// `None` models a store whose collection handle is absent
    store: Option<Arc<RwLock<Store>>>,
}

#[derive(Debug, Default)]
struct Store {
    next_id: i32,
    users: BTreeMap<i32, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: Some(Arc::new(RwLock::new(Store::default()))),
        }
    }

    /// A repository without a backing collection; every call fails with
    /// [`UserError::StoreUnavailable`].
    pub fn detached() -> Self {
        Self { store: None }
    }

    fn store(&self) -> UserResult<&Arc<RwLock<Store>>> {
        self.store
            .as_ref()
            .ok_or_else(|| UserError::StoreUnavailable("user collection is not configured".into()))
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> UserResult<Vec<User>> {
        let store = self.store()?.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let store = self.store()?.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store()?.write().await;

        store.next_id += 1;
        let user = User {
            id: store.next_id,
            email: user.email,
            user_type: user.user_type,
            version: 1,
            profile: user.profile,
        };
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn update(&self, mut user: User) -> UserResult<User> {
        let mut store = self.store()?.write().await;

        match store.users.get(&user.id) {
            Some(current) if current.version == user.version => {}
            _ => return Err(UserError::ConcurrencyConflict(user.id)),
        }

        user.version += 1;
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, version = user.version, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let mut store = self.store()?.write().await;

        if store.users.remove(&id).is_some() {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists(&self, predicate: UserPredicate) -> UserResult<bool> {
        let store = self.store()?.read().await;
        Ok(store.users.values().any(|u| predicate.matches(u)))
    }
}
