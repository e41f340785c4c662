use thiserror::Error;

use crate::validation::FieldError;

/// Business errors for auth workflows. `InvalidCredentials` deliberately
/// covers both unknown-email and wrong-password so responses cannot be used
/// to probe which addresses hold accounts.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account temporarily locked")]
    AccountLocked,
    #[error("email address not verified")]
    EmailNotVerified,
    #[error("token invalid")]
    TokenInvalid,
    #[error("token expired")]
    TokenExpired,
    #[error("token already used")]
    TokenAlreadyUsed,
    #[error("session expired")]
    SessionExpired,
    #[error("session revoked")]
    SessionRevoked,
    #[error("refresh token reuse detected")]
    SessionReuseDetected,
    #[error("hashing error: {0}")]
    Hashing(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("store error: {0}")]
    Store(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::EmailAlreadyRegistered => 1002,
            AuthError::InvalidCredentials => 1003,
            AuthError::AccountLocked => 1004,
            AuthError::EmailNotVerified => 1005,
            AuthError::TokenInvalid => 1010,
            AuthError::TokenExpired => 1011,
            AuthError::TokenAlreadyUsed => 1012,
            AuthError::SessionExpired => 1020,
            AuthError::SessionRevoked => 1021,
            AuthError::SessionReuseDetected => 1022,
            AuthError::Hashing(_) => 1101,
            AuthError::Token(_) => 1102,
            AuthError::Store(_) => 1200,
        }
    }
}
