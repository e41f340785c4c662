//! Persistence abstraction for the auth workflows, split along the four
//! concerns the service composes. The consume/rotate methods carry the
//! one-winner contract: under concurrent callers with the same token,
//! exactly one observes success.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::attempts::AttemptKind;
use super::domain::{Account, Role};
use super::errors::AuthError;
use super::sessions::{RotateOutcome, SessionRecord};
use super::tokens::TokenPurpose;

/// Outcome of a one-time token consume attempt.
#[derive(Debug)]
pub enum TokenConsume {
    Consumed { user_id: Uuid },
    NotFound,
    AlreadyUsed,
    Expired,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;
    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError>;
    /// A duplicate email fails `EmailAlreadyRegistered`; the store's unique
    /// constraint decides the race.
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, AuthError>;
    async fn set_password_hash(&self, user_id: Uuid, password_hash: &str)
        -> Result<(), AuthError>;
    async fn mark_email_verified(&self, user_id: Uuid, at: DateTime<Utc>)
        -> Result<(), AuthError>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Invalidates the user's outstanding tokens of this purpose, then
    /// records the new digest. At most one live token per user/purpose.
    async fn put_token(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;
    async fn consume_token(
        &self,
        purpose: TokenPurpose,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenConsume, AuthError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, record: &SessionRecord) -> Result<(), AuthError>;
    async fn rotate_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<RotateOutcome, AuthError>;
    async fn find_session_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, AuthError>;
    async fn revoke_session(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), AuthError>;
    async fn revoke_family(&self, family_id: Uuid, now: DateTime<Utc>) -> Result<u64, AuthError>;
    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AuthError>;
}

#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn record_attempt(
        &self,
        email: &str,
        kind: AttemptKind,
        client_addr: Option<&str>,
    ) -> Result<(), AuthError>;
    async fn count_recent_failures(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthError>;
}

/// Everything the auth service needs from persistence.
pub trait AuthRepository: CredentialStore + TokenStore + SessionStore + AttemptStore {}

impl<T: CredentialStore + TokenStore + SessionStore + AttemptStore> AuthRepository for T {}

/// In-memory repository for unit tests. A single mutex per concern gives the
/// same one-winner consume/rotate semantics as the conditional updates in
/// the SQL store.
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::auth::sessions::SessionState;

    #[derive(Debug, Clone)]
    struct MockToken {
        purpose: TokenPurpose,
        user_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
        consumed_at: Option<DateTime<Utc>>,
    }

    #[derive(Default)]
    pub struct MockAuthRepository {
        accounts: Mutex<HashMap<Uuid, Account>>,
        tokens: Mutex<Vec<MockToken>>,
        sessions: Mutex<Vec<SessionRecord>>,
        attempts: Mutex<Vec<(String, AttemptKind, DateTime<Utc>)>>,
    }

    impl MockAuthRepository {
        pub fn session_count(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }

        pub fn live_token_count(&self, purpose: TokenPurpose) -> usize {
            self.tokens
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.purpose == purpose && t.consumed_at.is_none())
                .count()
        }
    }

    #[async_trait]
    impl CredentialStore for MockAuthRepository {
        async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.values().find(|a| a.email == email).cloned())
        }

        async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.get(&id).cloned())
        }

        async fn create_account(
            &self,
            email: &str,
            password_hash: &str,
            role: Role,
        ) -> Result<Account, AuthError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.values().any(|a| a.email == email) {
                return Err(AuthError::EmailAlreadyRegistered);
            }
            let account = Account {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role,
                email_verified_at: None,
            };
            accounts.insert(account.id, account.clone());
            Ok(account)
        }

        async fn set_password_hash(
            &self,
            user_id: Uuid,
            password_hash: &str,
        ) -> Result<(), AuthError> {
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts
                .get_mut(&user_id)
                .ok_or_else(|| AuthError::Store("account not found".into()))?;
            account.password_hash = password_hash.to_string();
            Ok(())
        }

        async fn mark_email_verified(
            &self,
            user_id: Uuid,
            at: DateTime<Utc>,
        ) -> Result<(), AuthError> {
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts
                .get_mut(&user_id)
                .ok_or_else(|| AuthError::Store("account not found".into()))?;
            if account.email_verified_at.is_none() {
                account.email_verified_at = Some(at);
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TokenStore for MockAuthRepository {
        async fn put_token(
            &self,
            purpose: TokenPurpose,
            user_id: Uuid,
            token_hash: &str,
            expires_at: DateTime<Utc>,
        ) -> Result<(), AuthError> {
            let mut tokens = self.tokens.lock().unwrap();
            let now = Utc::now();
            for t in tokens.iter_mut() {
                if t.purpose == purpose && t.user_id == user_id && t.consumed_at.is_none() {
                    t.consumed_at = Some(now);
                }
            }
            tokens.push(MockToken {
                purpose,
                user_id,
                token_hash: token_hash.to_string(),
                expires_at,
                consumed_at: None,
            });
            Ok(())
        }

        async fn consume_token(
            &self,
            purpose: TokenPurpose,
            token_hash: &str,
            now: DateTime<Utc>,
        ) -> Result<TokenConsume, AuthError> {
            let mut tokens = self.tokens.lock().unwrap();
            let Some(t) = tokens
                .iter_mut()
                .find(|t| t.purpose == purpose && t.token_hash == token_hash)
            else {
                return Ok(TokenConsume::NotFound);
            };
            if t.consumed_at.is_some() {
                return Ok(TokenConsume::AlreadyUsed);
            }
            if t.expires_at <= now {
                return Ok(TokenConsume::Expired);
            }
            t.consumed_at = Some(now);
            Ok(TokenConsume::Consumed { user_id: t.user_id })
        }
    }

    #[async_trait]
    impl SessionStore for MockAuthRepository {
        async fn insert_session(&self, record: &SessionRecord) -> Result<(), AuthError> {
            self.sessions.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn rotate_session(
            &self,
            token_hash: &str,
            now: DateTime<Utc>,
        ) -> Result<RotateOutcome, AuthError> {
            let mut sessions = self.sessions.lock().unwrap();
            let Some(s) = sessions.iter_mut().find(|s| s.token_hash == token_hash) else {
                return Ok(RotateOutcome::NotFound);
            };
            match s.state {
                SessionState::Rotated => Ok(RotateOutcome::Reused(s.clone())),
                SessionState::Revoked => Ok(RotateOutcome::Revoked),
                SessionState::Active if s.expires_at <= now => {
                    Ok(RotateOutcome::Expired(s.clone()))
                }
                SessionState::Active => {
                    s.state = SessionState::Rotated;
                    Ok(RotateOutcome::Rotated(s.clone()))
                }
            }
        }

        async fn find_session_by_hash(
            &self,
            token_hash: &str,
        ) -> Result<Option<SessionRecord>, AuthError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions.iter().find(|s| s.token_hash == token_hash).cloned())
        }

        async fn revoke_session(&self, id: Uuid, _now: DateTime<Utc>) -> Result<(), AuthError> {
            let mut sessions = self.sessions.lock().unwrap();
            if let Some(s) = sessions.iter_mut().find(|s| s.id == id) {
                s.state = SessionState::Revoked;
            }
            Ok(())
        }

        async fn revoke_family(
            &self,
            family_id: Uuid,
            _now: DateTime<Utc>,
        ) -> Result<u64, AuthError> {
            let mut sessions = self.sessions.lock().unwrap();
            let mut n = 0;
            for s in sessions.iter_mut() {
                if s.family_id == family_id && s.state != SessionState::Revoked {
                    s.state = SessionState::Revoked;
                    n += 1;
                }
            }
            Ok(n)
        }

        async fn revoke_all_for_user(
            &self,
            user_id: Uuid,
            _now: DateTime<Utc>,
        ) -> Result<u64, AuthError> {
            let mut sessions = self.sessions.lock().unwrap();
            let mut n = 0;
            for s in sessions.iter_mut() {
                if s.user_id == user_id && s.state != SessionState::Revoked {
                    s.state = SessionState::Revoked;
                    n += 1;
                }
            }
            Ok(n)
        }
    }

    #[async_trait]
    impl AttemptStore for MockAuthRepository {
        async fn record_attempt(
            &self,
            email: &str,
            kind: AttemptKind,
            _client_addr: Option<&str>,
        ) -> Result<(), AuthError> {
            self.attempts.lock().unwrap().push((email.to_string(), kind, Utc::now()));
            Ok(())
        }

        async fn count_recent_failures(
            &self,
            email: &str,
            since: DateTime<Utc>,
        ) -> Result<u64, AuthError> {
            let attempts = self.attempts.lock().unwrap();
            Ok(attempts
                .iter()
                .filter(|(e, kind, at)| e == email && *kind == AttemptKind::Failure && *at >= since)
                .count() as u64)
        }
    }
}
