//! Outbound mail seam. The auth service hands the raw one-time token to the
//! mailer and forgets it; only the digest is ever stored.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::auth::errors::AuthError;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email_verification(&self, to: &str, raw_token: &str) -> Result<(), AuthError>;
    async fn send_password_reset(&self, to: &str, raw_token: &str) -> Result<(), AuthError>;
}

/// Development mailer: writes the message to the log instead of sending.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_email_verification(&self, to: &str, raw_token: &str) -> Result<(), AuthError> {
        info!(%to, "queued verification email");
        debug!(%to, token = %raw_token, "verification token (dev mailer)");
        Ok(())
    }

    async fn send_password_reset(&self, to: &str, raw_token: &str) -> Result<(), AuthError> {
        info!(%to, "queued password reset email");
        debug!(%to, token = %raw_token, "reset token (dev mailer)");
        Ok(())
    }
}

/// Capturing mailer for tests: remembers every message it was asked to send.
pub mod mock {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::Mailer;
    use crate::auth::errors::AuthError;
    use crate::auth::tokens::TokenPurpose;

    #[derive(Debug, Clone)]
    pub struct SentMail {
        pub to: String,
        pub purpose: TokenPurpose,
        pub token: String,
    }

    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<SentMail>>,
    }

    impl RecordingMailer {
        pub fn last_token_for(&self, to: &str, purpose: TokenPurpose) -> Option<String> {
            let sent = self.sent.lock().unwrap();
            sent.iter()
                .rev()
                .find(|m| m.to == to && m.purpose == purpose)
                .map(|m| m.token.clone())
        }

        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_email_verification(&self, to: &str, raw_token: &str) -> Result<(), AuthError> {
            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                purpose: TokenPurpose::EmailVerification,
                token: raw_token.to_string(),
            });
            Ok(())
        }

        async fn send_password_reset(&self, to: &str, raw_token: &str) -> Result<(), AuthError> {
            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                purpose: TokenPurpose::PasswordReset,
                token: raw_token.to_string(),
            });
            Ok(())
        }
    }
}
