//! Notification service for dispatching verification emails.

use crate::error::{NotificationError, NotificationResult};
use crate::models::{MailerConfig, VerificationEmailData, VerificationRequest};
use crate::providers::{EmailContent, EmailProvider};
use crate::templates::TemplateEngine;
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

/// Renders the verification email and hands it to the provider exactly once.
pub struct NotificationService<P: EmailProvider> {
    provider: Arc<P>,
    templates: TemplateEngine,
    mailer: Arc<MailerConfig>,
}

impl<P: EmailProvider> Clone for NotificationService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            templates: self.templates.clone(),
            mailer: Arc::clone(&self.mailer),
        }
    }
}

impl<P: EmailProvider> NotificationService<P> {
    pub fn new(provider: P, mailer: MailerConfig) -> NotificationResult<Self> {
        Ok(Self {
            provider: Arc::new(provider),
            templates: TemplateEngine::new()?,
            mailer: Arc::new(mailer),
        })
    }

    /// Send the OTP email.
    ///
    /// Any transport failure comes back as `DispatchFailed` with the
    /// transport's detail. Nothing is retried or queued.
    #[instrument(skip(self, request), fields(provider = self.provider.name()))]
    pub async fn send_verification_email(
        &self,
        request: VerificationRequest,
    ) -> NotificationResult<()> {
        request
            .validate()
            .map_err(|e| NotificationError::InvalidRequest(e.to_string()))?;

        let data = VerificationEmailData::new(&request.otp, &self.mailer);
        let rendered = self.templates.render_verification(&data)?;

        let to_email = self.mailer.recipient.resolve(&request.email).to_string();
        let email = EmailContent {
            to_email,
            subject: self.mailer.subject.clone(),
            html_body: rendered.html,
            text_body: rendered.text,
        };

        let sent = self.provider.send(&email).await.map_err(|e| {
            error!(to = %email.to_email, error = %e, "Verification email dispatch failed");
            match e {
                NotificationError::ProviderError(detail) => {
                    NotificationError::DispatchFailed(detail)
                }
                other => NotificationError::DispatchFailed(other.to_string()),
            }
        })?;

        if !sent.accepted {
            return Err(NotificationError::DispatchFailed(format!(
                "{} did not accept the message",
                self.provider.name()
            )));
        }

        info!(
            to = %email.to_email,
            message_id = ?sent.message_id,
            "Verification email sent"
        );

        Ok(())
    }

    /// Shared handle to the transport, for readiness probes.
    pub fn provider(&self) -> Arc<P> {
        Arc::clone(&self.provider)
    }
}
