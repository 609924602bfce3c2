//! Email template rendering engine.
//!
//! Handlebars templates for the verification email, HTML plus a plain-text
//! alternative.

use crate::error::{NotificationError, NotificationResult};
use crate::models::VerificationEmailData;
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Rendered email content.
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
}

/// Template engine for rendering email templates.
#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Arc<Handlebars<'static>>,
}

impl TemplateEngine {
    /// Create a new template engine with all templates registered.
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        handlebars
            .register_template_string("verification_html", VERIFICATION_HTML_TEMPLATE)
            .map_err(|e| {
                NotificationError::TemplateError(format!(
                    "Failed to register verification_html: {}",
                    e
                ))
            })?;
        handlebars
            .register_template_string("verification_text", VERIFICATION_TEXT_TEMPLATE)
            .map_err(|e| {
                NotificationError::TemplateError(format!(
                    "Failed to register verification_text: {}",
                    e
                ))
            })?;

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    fn render<T: Serialize>(&self, template_name: &str, data: &T) -> NotificationResult<String> {
        Ok(self.handlebars.render(template_name, data)?)
    }

    /// Render the OTP verification email.
    pub fn render_verification(
        &self,
        data: &VerificationEmailData,
    ) -> NotificationResult<RenderedEmail> {
        debug!(brand = %data.brand_name, "Rendering verification email");

        Ok(RenderedEmail {
            html: self.render("verification_html", data)?,
            text: self.render("verification_text", data)?,
        })
    }
}

const VERIFICATION_HTML_TEMPLATE: &str = r#"<div style="width:100%;background-color:lightgreen;text-align:center;margin:10px">
  <h1 style="color:navy;">Welcome to {{brand_name}}</h1>
  <img src="{{banner_url}}" alt="{{brand_name}}" />
  <h2 style="color:darkgreen;">Thanks for subscribing!</h2>
  <a href="{{subscribe_url}}" style="color:blue;">Please join membership by clicking the link</a>
  <div><h1 style="color:maroon;">Contact us: {{contact_email}}</h1></div>
  <div><h1>6 digit Otp : {{otp}}</h1></div>
</div>"#;

const VERIFICATION_TEXT_TEMPLATE: &str = r#"Welcome to {{brand_name}}

Thanks for subscribing!

Join the membership: {{subscribe_url}}

Your 6 digit OTP: {{otp}}

Contact us: {{contact_email}}"#;
