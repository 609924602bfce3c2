//! Notifications Domain
//!
//! Dispatches the OTP verification email. The code is supplied by the caller;
//! this crate only renders and sends it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   API Handler   │  ← POST /send-mail
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ NotificationSvc │  ← Validate, render, resolve recipient
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐
//! │ Email Provider  │  ← SMTP, or in-memory capture
//! └─────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_notifications::{
//!     MailerConfig, NotificationService, handlers, providers::MockEmailProvider,
//! };
//!
//! let service = NotificationService::new(MockEmailProvider::new(), MailerConfig::default())
//!     .expect("templates compile");
//!
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod service;
pub mod templates;

// Re-export commonly used types
pub use error::{NotificationError, NotificationResult};
pub use models::{MailerConfig, OTP_LENGTH, RecipientPolicy, VerificationRequest};
pub use providers::{EmailProvider, MockEmailProvider, SmtpConfig, SmtpProvider};
pub use service::NotificationService;
pub use templates::TemplateEngine;
