//! Application state shared by the readiness handler and the shutdown path.

use domain_notifications::EmailProvider;
use std::sync::Arc;

/// Cloned per request (the connection pool is an `Arc` internally).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL pool; `None` when users live in memory
    pub db: Option<database::postgres::DatabaseConnection>,
    /// Transport behind the verification emails
    pub email: Arc<dyn EmailProvider>,
}
