use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_optional, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_notifications::{MailerConfig, SmtpConfig};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Backing store for the users domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserStore {
    Postgres,
    /// Process-local map; contents are lost on restart
    Memory,
}

impl UserStore {
    /// `USER_STORE`: `postgres` (default) or `memory`
    fn from_env() -> Result<Self, ConfigError> {
        match env_optional("USER_STORE").as_deref().map(str::trim) {
            None => Ok(UserStore::Postgres),
            Some(v) if v.eq_ignore_ascii_case("postgres") => Ok(UserStore::Postgres),
            Some(v) if v.eq_ignore_ascii_case("memory") => Ok(UserStore::Memory),
            Some(other) => Err(ConfigError::InvalidValue {
                key: "USER_STORE".to_string(),
                details: format!("expected 'postgres' or 'memory', got '{}'", other),
            }),
        }
    }
}

/// How verification emails leave the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmailTransport {
    Smtp,
    /// Captured in memory and logged, never delivered
    Log,
}

impl EmailTransport {
    /// `EMAIL_TRANSPORT`: `smtp` or `log`; defaults to `smtp` in production
    fn from_env(environment: &Environment) -> Result<Self, ConfigError> {
        match env_optional("EMAIL_TRANSPORT").as_deref().map(str::trim) {
            None if environment.is_production() => Ok(EmailTransport::Smtp),
            None => Ok(EmailTransport::Log),
            Some(v) if v.eq_ignore_ascii_case("smtp") => Ok(EmailTransport::Smtp),
            Some(v) if v.eq_ignore_ascii_case("log") => Ok(EmailTransport::Log),
            Some(other) => Err(ConfigError::InvalidValue {
                key: "EMAIL_TRANSPORT".to_string(),
                details: format!("expected 'smtp' or 'log', got '{}'", other),
            }),
        }
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub user_store: UserStore,
    /// Present only for `UserStore::Postgres`
    pub database: Option<PostgresConfig>,
    pub email_transport: EmailTransport,
    pub smtp: SmtpConfig,
    pub mailer: MailerConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let user_store = UserStore::from_env()?;

        let database = match user_store {
            UserStore::Postgres => Some(PostgresConfig::from_env()?), // DATABASE_URL required
            UserStore::Memory => None,
        };

        let email_transport = EmailTransport::from_env(&environment)?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            user_store,
            database,
            email_transport,
            smtp: SmtpConfig::from_env()?,
            mailer: MailerConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_does_not_need_database_url() {
        temp_env::with_vars(
            [
                ("USER_STORE", Some("memory")),
                ("DATABASE_URL", None),
                ("APP_ENV", None),
                ("EMAIL_TRANSPORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.user_store, UserStore::Memory);
                assert!(config.database.is_none());
                assert_eq!(config.email_transport, EmailTransport::Log);
                assert_eq!(config.app.name, "aadhar_api");
            },
        );
    }

    #[test]
    fn test_postgres_store_requires_database_url() {
        temp_env::with_vars(
            [("USER_STORE", None::<&str>), ("DATABASE_URL", None)],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("DATABASE_URL"));
            },
        );
    }

    #[test]
    fn test_postgres_store_reads_database_config() {
        temp_env::with_vars(
            [
                ("USER_STORE", Some("Postgres")),
                ("DATABASE_URL", Some("postgresql://localhost/aadhar")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.user_store, UserStore::Postgres);
                assert_eq!(
                    config.database.map(|db| db.url).as_deref(),
                    Some("postgresql://localhost/aadhar")
                );
            },
        );
    }

    #[test]
    fn test_production_defaults_to_smtp() {
        temp_env::with_vars(
            [
                ("USER_STORE", Some("memory")),
                ("APP_ENV", Some("production")),
                ("EMAIL_TRANSPORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.email_transport, EmailTransport::Smtp);
            },
        );
    }

    #[test]
    fn test_unknown_store_is_rejected() {
        temp_env::with_var("USER_STORE", Some("mongo"), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("USER_STORE"));
        });
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        temp_env::with_vars(
            [
                ("USER_STORE", Some("memory")),
                ("EMAIL_TRANSPORT", Some("carrier-pigeon")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("EMAIL_TRANSPORT"));
            },
        );
    }
}
