//! Data models for the notifications domain.

use core_config::{ConfigError, FromEnv, env_optional, env_or_default};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

pub const OTP_LENGTH: usize = 6;

/// Request to email a caller-supplied one-time code.
///
/// The code is neither generated nor stored here; it is only rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "validate_otp"))]
    pub otp: String,
}

fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.len() == OTP_LENGTH && otp.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("otp")
            .with_message(format!("OTP must be exactly {OTP_LENGTH} digits").into()))
    }
}

/// Who receives the verification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientPolicy {
    /// The address named in the request
    Requester,
    /// Every verification email goes to one configured mailbox
    Fixed(String),
}

impl RecipientPolicy {
    pub fn resolve<'a>(&'a self, requested: &'a str) -> &'a str {
        match self {
            RecipientPolicy::Requester => requested,
            RecipientPolicy::Fixed(address) => address,
        }
    }
}

/// Branding and routing for the verification email.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub subject: String,
    pub brand_name: String,
    pub banner_url: String,
    pub subscribe_url: String,
    pub contact_email: String,
    pub recipient: RecipientPolicy,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            subject: "Welcome to AadharVerify".to_string(),
            brand_name: "Aadhar Verify".to_string(),
            banner_url: "https://aadharverify.example/banner.jpg".to_string(),
            subscribe_url: "https://aadharverify.example/membership".to_string(),
            contact_email: "contact@aadharverify.example".to_string(),
            recipient: RecipientPolicy::Requester,
        }
    }
}

impl FromEnv for MailerConfig {
    /// - VERIFICATION_SUBJECT, MAIL_BRAND_NAME, MAIL_BANNER_URL,
    ///   MAIL_SUBSCRIBE_URL, MAIL_CONTACT_EMAIL: fall back to the defaults
    /// - VERIFICATION_FIXED_RECIPIENT: when set, overrides the requester address
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let recipient = match env_optional("VERIFICATION_FIXED_RECIPIENT") {
            Some(address) if address.validate_email() => RecipientPolicy::Fixed(address),
            Some(address) => {
                return Err(ConfigError::InvalidValue {
                    key: "VERIFICATION_FIXED_RECIPIENT".to_string(),
                    details: format!("'{}' is not an email address", address),
                });
            }
            None => RecipientPolicy::Requester,
        };

        Ok(Self {
            subject: env_or_default("VERIFICATION_SUBJECT", &defaults.subject),
            brand_name: env_or_default("MAIL_BRAND_NAME", &defaults.brand_name),
            banner_url: env_or_default("MAIL_BANNER_URL", &defaults.banner_url),
            subscribe_url: env_or_default("MAIL_SUBSCRIBE_URL", &defaults.subscribe_url),
            contact_email: env_or_default("MAIL_CONTACT_EMAIL", &defaults.contact_email),
            recipient,
        })
    }
}

/// Template context for the verification email.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationEmailData {
    pub otp: String,
    pub brand_name: String,
    pub banner_url: String,
    pub subscribe_url: String,
    pub contact_email: String,
}

impl VerificationEmailData {
    pub fn new(otp: &str, mailer: &MailerConfig) -> Self {
        Self {
            otp: otp.to_string(),
            brand_name: mailer.brand_name.clone(),
            banner_url: mailer.banner_url.clone(),
            subscribe_url: mailer.subscribe_url.clone(),
            contact_email: mailer.contact_email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, otp: &str) -> VerificationRequest {
        VerificationRequest {
            email: email.to_string(),
            otp: otp.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("x@y.com", "482913").validate().is_ok());
        assert!(request("x@y.com", "000000").validate().is_ok());
    }

    #[test]
    fn test_otp_must_be_six_ascii_digits() {
        for otp in ["12345", "1234567", "12a456", "", "１２３４５６", " 12345"] {
            assert!(
                request("x@y.com", otp).validate().is_err(),
                "{otp:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_email_is_validated() {
        assert!(request("not-an-email", "482913").validate().is_err());
    }

    #[test]
    fn test_recipient_policy() {
        assert_eq!(RecipientPolicy::Requester.resolve("x@y.com"), "x@y.com");
        assert_eq!(
            RecipientPolicy::Fixed("ops@example.com".into()).resolve("x@y.com"),
            "ops@example.com"
        );
    }

    #[test]
    fn test_mailer_config_defaults_to_requester() {
        temp_env::with_vars_unset(
            ["VERIFICATION_FIXED_RECIPIENT", "VERIFICATION_SUBJECT"],
            || {
                let config = MailerConfig::from_env().unwrap();
                assert_eq!(config.recipient, RecipientPolicy::Requester);
                assert_eq!(config.subject, "Welcome to AadharVerify");
            },
        );
    }

    #[test]
    fn test_mailer_config_fixed_recipient() {
        temp_env::with_var(
            "VERIFICATION_FIXED_RECIPIENT",
            Some("ops@example.com"),
            || {
                let config = MailerConfig::from_env().unwrap();
                assert_eq!(
                    config.recipient,
                    RecipientPolicy::Fixed("ops@example.com".into())
                );
            },
        );
    }

    #[test]
    fn test_mailer_config_rejects_bad_fixed_recipient() {
        for address in ["nobody", "@", "ops@", "two words@example.com"] {
            temp_env::with_var("VERIFICATION_FIXED_RECIPIENT", Some(address), || {
                assert!(
                    MailerConfig::from_env().is_err(),
                    "{address:?} should be rejected"
                );
            });
        }
    }
}
