//! Opaque one-time tokens and JWT access tokens.
//!
//! Raw one-time tokens are 32 bytes from the OS RNG, hex encoded. Stores only
//! ever see the SHA-256 digest; the raw value is handed out exactly once.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::domain::{Account, Role};
use super::errors::AuthError;

pub const RAW_TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

/// 256 bits of entropy, hex encoded (64 chars).
pub fn generate_raw() -> String {
    let mut buf = [0u8; RAW_TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// The stored form of a raw token.
pub fn digest(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 access-token signer/verifier.
pub struct JwtSigner {
    enc: EncodingKey,
    dec: DecodingKey,
    ttl: Duration,
}

impl JwtSigner {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret.as_bytes()),
            dec: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, account: &Account, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            sub: account.email.clone(),
            uid: account.id,
            role: account.role.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.enc).map_err(|e| AuthError::Token(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.dec, &Validation::default())
            .map_err(|e| AuthError::Token(e.to_string()))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            email: "jwt@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            role: Role::User,
            email_verified_at: None,
        }
    }

    #[test]
    fn raw_tokens_are_unique_hex() {
        let a = generate_raw();
        let b = generate_raw();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_is_stable_and_distinct_from_raw() {
        let raw = generate_raw();
        assert_eq!(digest(&raw), digest(&raw));
        assert_ne!(digest(&raw), raw);
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let signer = JwtSigner::new("unit-test-secret", 15);
        let acct = account();
        let token = signer.issue(&acct, Utc::now()).unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, acct.email);
        assert_eq!(claims.uid, acct.id);
    }

    #[test]
    fn expired_access_token_rejected() {
        let signer = JwtSigner::new("unit-test-secret", 15);
        let issued = signer.issue(&account(), Utc::now() - Duration::hours(2)).unwrap();
        assert!(signer.verify(&issued).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let signer = JwtSigner::new("secret-a", 15);
        let other = JwtSigner::new("secret-b", 15);
        let token = signer.issue(&account(), Utc::now()).unwrap();
        assert!(other.verify(&token).is_err());
    }
}
