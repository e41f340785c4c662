//! SeaORM-backed auth repository. All state-machine semantics (single-use
//! consume, rotation) live in the conditional updates inside `models`; this
//! layer only maps rows and errors into domain terms.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::errors::ModelError;
use models::TokenConsumeOutcome;

use crate::auth::attempts::AttemptKind;
use crate::auth::domain::{Account, Role};
use crate::auth::errors::AuthError;
use crate::auth::repository::{
    AttemptStore, CredentialStore, SessionStore, TokenConsume, TokenStore,
};
use crate::auth::sessions::{RotateOutcome, SessionRecord, SessionState};
use crate::auth::tokens::TokenPurpose;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn store_err(e: ModelError) -> AuthError {
    match e {
        ModelError::Conflict(_) => AuthError::EmailAlreadyRegistered,
        other => AuthError::Store(other.to_string()),
    }
}

fn account_from(u: models::user::Model) -> Account {
    Account {
        id: u.id,
        email: u.email,
        password_hash: u.password_hash,
        role: u.role,
        email_verified_at: u.email_verified_at.map(|t| t.with_timezone(&Utc)),
    }
}

fn session_from(s: models::session::Model) -> SessionRecord {
    let state = match s.status {
        models::session::SessionStatus::Active => SessionState::Active,
        models::session::SessionStatus::Rotated => SessionState::Rotated,
        models::session::SessionStatus::Revoked => SessionState::Revoked,
    };
    SessionRecord {
        id: s.id,
        user_id: s.user_id,
        family_id: s.family_id,
        token_hash: s.refresh_token_hash,
        state,
        issued_at: s.issued_at.with_timezone(&Utc),
        expires_at: s.expires_at.with_timezone(&Utc),
    }
}

#[async_trait]
impl CredentialStore for SeaOrmAuthRepository {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let found = models::user::find_by_email(&self.db, email).await.map_err(store_err)?;
        Ok(found.map(account_from))
    }

    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        use sea_orm::EntityTrait;
        let found = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(found.map(account_from))
    }

    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Account, AuthError> {
        let created = models::user::create(&self.db, email, password_hash, role)
            .await
            .map_err(store_err)?;
        Ok(account_from(created))
    }

    async fn set_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        models::user::set_password_hash(&self.db, user_id, password_hash)
            .await
            .map_err(store_err)
    }

    async fn mark_email_verified(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        models::user::mark_email_verified(&self.db, user_id, at.into())
            .await
            .map_err(store_err)
    }
}

#[async_trait]
impl TokenStore for SeaOrmAuthRepository {
    async fn put_token(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let now = Utc::now().into();
        match purpose {
            TokenPurpose::EmailVerification => {
                models::verification_token::invalidate_outstanding(&self.db, user_id, now)
                    .await
                    .map_err(store_err)?;
                models::verification_token::insert(&self.db, user_id, token_hash, expires_at.into())
                    .await
                    .map_err(store_err)?;
            }
            TokenPurpose::PasswordReset => {
                models::password_reset_token::invalidate_outstanding(&self.db, user_id, now)
                    .await
                    .map_err(store_err)?;
                models::password_reset_token::insert(
                    &self.db,
                    user_id,
                    token_hash,
                    expires_at.into(),
                )
                .await
                .map_err(store_err)?;
            }
        }
        Ok(())
    }

    async fn consume_token(
        &self,
        purpose: TokenPurpose,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenConsume, AuthError> {
        let outcome = match purpose {
            TokenPurpose::EmailVerification => {
                models::verification_token::consume(&self.db, token_hash, now.into())
                    .await
                    .map_err(store_err)?
                    .map_user(|t| t.user_id)
            }
            TokenPurpose::PasswordReset => {
                models::password_reset_token::consume(&self.db, token_hash, now.into())
                    .await
                    .map_err(store_err)?
                    .map_user(|t| t.user_id)
            }
        };
        Ok(outcome)
    }
}

trait MapUser<M> {
    fn map_user(self, f: impl FnOnce(M) -> Uuid) -> TokenConsume;
}

impl<M> MapUser<M> for TokenConsumeOutcome<M> {
    fn map_user(self, f: impl FnOnce(M) -> Uuid) -> TokenConsume {
        match self {
            TokenConsumeOutcome::Consumed(m) => TokenConsume::Consumed { user_id: f(m) },
            TokenConsumeOutcome::NotFound => TokenConsume::NotFound,
            TokenConsumeOutcome::AlreadyUsed => TokenConsume::AlreadyUsed,
            TokenConsumeOutcome::Expired => TokenConsume::Expired,
        }
    }
}

#[async_trait]
impl SessionStore for SeaOrmAuthRepository {
    async fn insert_session(&self, record: &SessionRecord) -> Result<(), AuthError> {
        models::session::insert(
            &self.db,
            record.id,
            record.user_id,
            record.family_id,
            &record.token_hash,
            record.issued_at.into(),
            record.expires_at.into(),
        )
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn rotate_session(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<RotateOutcome, AuthError> {
        let outcome = models::session::rotate(&self.db, token_hash, now.into())
            .await
            .map_err(store_err)?;
        Ok(match outcome {
            models::session::RotateOutcome::Rotated(s) => RotateOutcome::Rotated(session_from(s)),
            models::session::RotateOutcome::NotFound => RotateOutcome::NotFound,
            models::session::RotateOutcome::Reused(s) => RotateOutcome::Reused(session_from(s)),
            models::session::RotateOutcome::Revoked => RotateOutcome::Revoked,
            models::session::RotateOutcome::Expired(s) => RotateOutcome::Expired(session_from(s)),
        })
    }

    async fn find_session_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, AuthError> {
        let found = models::session::find_by_token_hash(&self.db, token_hash)
            .await
            .map_err(store_err)?;
        Ok(found.map(session_from))
    }

    async fn revoke_session(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), AuthError> {
        models::session::revoke_by_id(&self.db, id, now.into()).await.map_err(store_err)?;
        Ok(())
    }

    async fn revoke_family(&self, family_id: Uuid, now: DateTime<Utc>) -> Result<u64, AuthError> {
        models::session::revoke_family(&self.db, family_id, now.into())
            .await
            .map_err(store_err)
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AuthError> {
        models::session::revoke_all_for_user(&self.db, user_id, now.into())
            .await
            .map_err(store_err)
    }
}

#[async_trait]
impl AttemptStore for SeaOrmAuthRepository {
    async fn record_attempt(
        &self,
        email: &str,
        kind: AttemptKind,
        client_addr: Option<&str>,
    ) -> Result<(), AuthError> {
        let outcome = match kind {
            AttemptKind::Success => models::login_attempt::AttemptOutcome::Success,
            AttemptKind::Failure => models::login_attempt::AttemptOutcome::Failure,
        };
        models::login_attempt::record(&self.db, email, outcome, client_addr)
            .await
            .map_err(store_err)
    }

    async fn count_recent_failures(
        &self,
        email: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthError> {
        models::login_attempt::count_failures_since(&self.db, email, since.into())
            .await
            .map_err(store_err)
    }
}
