use axum::Router;
use axum_helpers::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_notifications::{EmailProvider, MockEmailProvider, NotificationService, SmtpProvider};
use domain_users::{InMemoryUserRepository, PgUserRepository, UserService};
use eyre::WrapErr;
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod state;

use config::{Config, EmailTransport};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = match config.database.clone() {
        Some(database) => {
            let db = database::postgres::connect_from_config_with_retry(database, None)
                .await
                .wrap_err("PostgreSQL connection failed")?;
            database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
                .await
                .wrap_err("Database migrations failed")?;
            Some(db)
        }
        None => {
            warn!("USER_STORE=memory: users are kept in process memory and lost on restart");
            None
        }
    };

    let users = match &db {
        Some(db) => domain_users::handlers::router(UserService::new(PgUserRepository::new(
            db.clone(),
        ))),
        None => domain_users::handlers::router(UserService::new(InMemoryUserRepository::new())),
    };

    let (notifications, email) = notifications_router(&config)?;

    let state = AppState { config, db, email };

    // create_router adds /api prefix, middleware and the JSON 404 fallback
    let router = create_router(api::routes(users, notifications), &state.config.server)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the user store and email transport
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        store = ?state.config.user_store,
        email_transport = ?state.config.email_transport,
        "Starting aadhar API"
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        if let Some(db) = state.db {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        }
    })
    .await
    .wrap_err("Server error")?;

    info!("Aadhar API shutdown complete");
    Ok(())
}

/// Builds the notifications router and returns the transport for `/ready`.
fn notifications_router(config: &Config) -> eyre::Result<(Router, Arc<dyn EmailProvider>)> {
    match config.email_transport {
        EmailTransport::Smtp => {
            let provider = SmtpProvider::new(config.smtp.clone())?;
            info!(host = %config.smtp.host, port = config.smtp.port, "Email transport: SMTP");
            let service = NotificationService::new(provider, config.mailer.clone())?;
            let email: Arc<dyn EmailProvider> = service.provider();
            Ok((domain_notifications::handlers::router(service), email))
        }
        EmailTransport::Log => {
            warn!("EMAIL_TRANSPORT=log: verification emails are logged, not delivered");
            let service = NotificationService::new(MockEmailProvider::new(), config.mailer.clone())?;
            let email: Arc<dyn EmailProvider> = service.provider();
            Ok((domain_notifications::handlers::router(service), email))
        }
    }
}
