//! PostgreSQL connectivity for the API
//!
//! Connection pooling via SeaORM, startup retry with backoff, a readiness
//! probe, and a generic migration runner.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "aadhar_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, RetryConfig};
