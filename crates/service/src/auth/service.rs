use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::mailer::Mailer;
use crate::validation::ValidateRequest;

use super::attempts::{AttemptKind, LockoutPolicy};
use super::domain::{
    Account, AuthSession, LoginInput, RegisterInput, ResetPasswordInput, Role,
};
use super::errors::AuthError;
use super::hasher::PasswordHasher;
use super::repository::{AuthRepository, TokenConsume};
use super::sessions::{self, RotateOutcome};
use super::tokens::{self, Claims, JwtSigner, TokenPurpose};

/// Auth business service independent of the web framework. Generic over the
/// repository so the full workflow suite runs against the in-memory mock.
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    hasher: PasswordHasher,
    jwt: Option<JwtSigner>,
    mailer: Arc<dyn Mailer>,
    lockout: LockoutPolicy,
    settings: configs::AuthSettings,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(
        repo: Arc<R>,
        settings: configs::AuthSettings,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::from_settings(&settings)?;
        let jwt = settings
            .jwt_secret
            .as_deref()
            .map(|secret| JwtSigner::new(secret, settings.access_token_ttl_minutes));
        let lockout = LockoutPolicy::from_settings(&settings);
        Ok(Self { repo, hasher, jwt, mailer, lockout, settings })
    }

    /// Validate an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        let signer = self
            .jwt
            .as_ref()
            .ok_or_else(|| AuthError::Token("no signing secret configured".into()))?;
        signer.verify(token)
    }

    /// Look up an account by id.
    pub async fn account(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        self.repo.find_account_by_id(id).await
    }

    /// Create an unverified account and mail a verification token. The
    /// password is hashed before the store is touched; the store's unique
    /// email constraint decides concurrent registrations.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<Account, AuthError> {
        input.validate().map_err(AuthError::Validation)?;
        let email = models::user::normalize_email(&input.email);
        let hash = self.hasher.hash(&input.password)?;
        let account = self.repo.create_account(&email, &hash, Role::User).await?;
        self.issue_verification(&account).await?;
        info!(user_id = %account.id, "account registered");
        Ok(account)
    }

    /// Authenticate and open a refresh-token session.
    ///
    /// The lockout check runs before any credential work, and attempts made
    /// while locked are not recorded, so a lockout always expires once the
    /// window slides past the failures that caused it. Unknown email and
    /// wrong password are indistinguishable to the caller.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        input.validate().map_err(AuthError::Validation)?;
        let email = models::user::normalize_email(&input.email);
        let addr = input.client_addr.as_deref();
        let now = Utc::now();

        let failures =
            self.repo.count_recent_failures(&email, self.lockout.window_start(now)).await?;
        if self.lockout.locks(failures) {
            warn!(%failures, "login rejected: account locked");
            return Err(AuthError::AccountLocked);
        }

        let account = match self.repo.find_account_by_email(&email).await? {
            Some(a) => a,
            None => {
                self.repo.record_attempt(&email, AttemptKind::Failure, addr).await?;
                return Err(AuthError::InvalidCredentials);
            }
        };
        if !self.hasher.verify(&input.password, &account.password_hash) {
            self.repo.record_attempt(&email, AttemptKind::Failure, addr).await?;
            return Err(AuthError::InvalidCredentials);
        }

        // The credential check passed, so the attempt is a success even if
        // policy blocks the session below.
        self.repo.record_attempt(&email, AttemptKind::Success, addr).await?;

        if self.settings.require_verified_email && account.email_verified_at.is_none() {
            return Err(AuthError::EmailNotVerified);
        }

        let session = self.open_session_in_family(&account, Uuid::new_v4()).await?;
        info!(user_id = %account.id, "login succeeded");
        Ok(session)
    }

    /// Exchange a refresh token for a fresh pair. Rotation is exactly-once;
    /// presenting a rotated-out token burns its whole family.
    #[instrument(skip_all)]
    pub async fn refresh(&self, raw_token: &str) -> Result<AuthSession, AuthError> {
        if crate::validation::check_token(raw_token).is_some() {
            return Err(AuthError::TokenInvalid);
        }
        let hash = tokens::digest(raw_token);
        let now = Utc::now();
        match self.repo.rotate_session(&hash, now).await? {
            RotateOutcome::Rotated(old) => {
                let account = self
                    .repo
                    .find_account_by_id(old.user_id)
                    .await?
                    .ok_or_else(|| AuthError::Store("account missing for session".into()))?;
                let session = self.open_session_in_family(&account, old.family_id).await?;
                Ok(session)
            }
            RotateOutcome::Reused(s) => {
                let revoked = self.repo.revoke_family(s.family_id, now).await?;
                warn!(user_id = %s.user_id, family_id = %s.family_id, %revoked,
                    "refresh token reuse: family revoked");
                Err(AuthError::SessionReuseDetected)
            }
            RotateOutcome::Revoked => Err(AuthError::SessionRevoked),
            RotateOutcome::Expired(s) => {
                self.repo.revoke_session(s.id, now).await?;
                Err(AuthError::SessionExpired)
            }
            RotateOutcome::NotFound => Err(AuthError::TokenInvalid),
        }
    }

    /// Revoke the family behind a presented refresh token. Unknown tokens
    /// are a no-op so logout stays idempotent.
    #[instrument(skip_all)]
    pub async fn logout(&self, raw_token: &str) -> Result<(), AuthError> {
        let hash = tokens::digest(raw_token);
        if let Some(s) = self.repo.find_session_by_hash(&hash).await? {
            let revoked = self.repo.revoke_family(s.family_id, Utc::now()).await?;
            info!(user_id = %s.user_id, %revoked, "logout");
        }
        Ok(())
    }

    /// Revoke every session the user holds, across all devices.
    #[instrument(skip(self))]
    pub async fn logout_all(&self, user_id: Uuid) -> Result<u64, AuthError> {
        let revoked = self.repo.revoke_all_for_user(user_id, Utc::now()).await?;
        info!(%revoked, "logout all sessions");
        Ok(revoked)
    }

    /// Consume a verification token and stamp the account verified.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, raw_token: &str) -> Result<(), AuthError> {
        if crate::validation::check_token(raw_token).is_some() {
            return Err(AuthError::TokenInvalid);
        }
        let now = Utc::now();
        let user_id = self
            .consume(TokenPurpose::EmailVerification, raw_token, now)
            .await?;
        self.repo.mark_email_verified(user_id, now).await?;
        info!(%user_id, "email verified");
        Ok(())
    }

    /// Re-issue a verification token. The ack is identical whether or not
    /// the address has an account, so the endpoint cannot be used to probe.
    #[instrument(skip(self))]
    pub async fn resend_verification(&self, email: &str) -> Result<(), AuthError> {
        let email = models::user::normalize_email(email);
        match self.repo.find_account_by_email(&email).await? {
            Some(account) if account.email_verified_at.is_none() => {
                self.issue_verification(&account).await
            }
            _ => Ok(()),
        }
    }

    /// Issue a password reset token. Same generic ack as above.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = models::user::normalize_email(email);
        let Some(account) = self.repo.find_account_by_email(&email).await? else {
            return Ok(());
        };
        let raw = tokens::generate_raw();
        let expires_at = Utc::now() + Duration::minutes(self.settings.reset_token_ttl_minutes);
        self.repo
            .put_token(TokenPurpose::PasswordReset, account.id, &tokens::digest(&raw), expires_at)
            .await?;
        self.mailer.send_password_reset(&account.email, &raw).await?;
        info!(user_id = %account.id, "password reset token issued");
        Ok(())
    }

    /// Consume a reset token, replace the password, and revoke every session
    /// for the account.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, input: ResetPasswordInput) -> Result<(), AuthError> {
        input.validate().map_err(AuthError::Validation)?;
        let now = Utc::now();
        let user_id = self.consume(TokenPurpose::PasswordReset, &input.token, now).await?;
        let hash = self.hasher.hash(&input.new_password)?;
        self.repo.set_password_hash(user_id, &hash).await?;
        let revoked = self.repo.revoke_all_for_user(user_id, now).await?;
        info!(%user_id, %revoked, "password reset");
        Ok(())
    }

    async fn consume(
        &self,
        purpose: TokenPurpose,
        raw_token: &str,
        now: chrono::DateTime<Utc>,
    ) -> Result<Uuid, AuthError> {
        match self.repo.consume_token(purpose, &tokens::digest(raw_token), now).await? {
            TokenConsume::Consumed { user_id } => Ok(user_id),
            TokenConsume::NotFound => Err(AuthError::TokenInvalid),
            TokenConsume::AlreadyUsed => Err(AuthError::TokenAlreadyUsed),
            TokenConsume::Expired => Err(AuthError::TokenExpired),
        }
    }

    async fn issue_verification(&self, account: &Account) -> Result<(), AuthError> {
        let raw = tokens::generate_raw();
        let expires_at =
            Utc::now() + Duration::hours(self.settings.verification_token_ttl_hours);
        self.repo
            .put_token(
                TokenPurpose::EmailVerification,
                account.id,
                &tokens::digest(&raw),
                expires_at,
            )
            .await?;
        self.mailer.send_email_verification(&account.email, &raw).await
    }

    /// Mint and persist a session, then build the token pair. `family_id` is
    /// fresh on login and inherited on rotation.
    async fn open_session_in_family(
        &self,
        account: &Account,
        family_id: Uuid,
    ) -> Result<AuthSession, AuthError> {
        let now = Utc::now();
        let ttl = Duration::days(self.settings.refresh_token_ttl_days);
        let minted = sessions::mint(account.id, family_id, now, ttl);
        self.repo.insert_session(&minted.record).await?;
        let access_token =
            self.jwt.as_ref().map(|signer| signer.issue(account, now)).transpose()?;
        Ok(AuthSession {
            user: account.clone(),
            access_token,
            refresh_token: minted.raw_token,
            refresh_expires_at: minted.record.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::mock::RecordingMailer;
    use crate::auth::repository::mock::MockAuthRepository;

    const EMAIL: &str = "field.tech@example.com";
    const PASSWORD: &str = "Corr3ct-horse";

    fn settings() -> configs::AuthSettings {
        configs::AuthSettings {
            jwt_secret: Some("unit-test-secret".into()),
            require_verified_email: false,
            // minimum legal argon2 cost so the suite stays fast
            argon2_memory_kib: 8,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..Default::default()
        }
    }

    struct Harness {
        svc: Arc<AuthService<MockAuthRepository>>,
        repo: Arc<MockAuthRepository>,
        mailer: Arc<RecordingMailer>,
    }

    fn harness(settings: configs::AuthSettings) -> Harness {
        let repo = Arc::new(MockAuthRepository::default());
        let mailer = Arc::new(RecordingMailer::default());
        let svc = Arc::new(
            AuthService::new(repo.clone(), settings, mailer.clone() as Arc<dyn crate::mailer::Mailer>)
                .unwrap(),
        );
        Harness { svc, repo, mailer }
    }

    fn register_input() -> RegisterInput {
        RegisterInput { email: EMAIL.into(), password: PASSWORD.into() }
    }

    fn login_input(password: &str) -> LoginInput {
        LoginInput { email: EMAIL.into(), password: password.into(), client_addr: None }
    }

    async fn register_and_verify(h: &Harness) -> Account {
        let account = h.svc.register(register_input()).await.unwrap();
        let token = h
            .mailer
            .last_token_for(EMAIL, TokenPurpose::EmailVerification)
            .expect("verification mail sent");
        h.svc.verify_email(&token).await.unwrap();
        account
    }

    #[tokio::test]
    async fn register_normalizes_email_and_mails_token() {
        let h = harness(settings());
        let account = h
            .svc
            .register(RegisterInput { email: "  Field.Tech@Example.COM ".into(), password: PASSWORD.into() })
            .await
            .unwrap();
        assert_eq!(account.email, EMAIL);
        assert!(account.email_verified_at.is_none());
        assert!(account.password_hash.starts_with("$argon2id$"));
        let token = h.mailer.last_token_for(EMAIL, TokenPurpose::EmailVerification).unwrap();
        assert_eq!(token.len(), 64);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let err = h.svc.register(register_input()).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailAlreadyRegistered));
    }

    #[tokio::test]
    async fn weak_password_rejected_before_any_store_call() {
        let h = harness(settings());
        let err = h
            .svc
            .register(RegisterInput { email: EMAIL.into(), password: "weak".into() })
            .await
            .unwrap_err();
        let AuthError::Validation(fields) = err else { panic!("expected validation") };
        assert_eq!(fields[0].field, "password");
        assert_eq!(h.mailer.count(), 0);
    }

    #[tokio::test]
    async fn login_unknown_email_and_wrong_password_are_indistinguishable() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();

        let unknown = h
            .svc
            .login(LoginInput {
                email: "nobody@example.com".into(),
                password: PASSWORD.into(),
                client_addr: None,
            })
            .await
            .unwrap_err();
        let wrong = h.svc.login(login_input("Wrong-pass1!")).await.unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_session_and_access_token() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let session = h.svc.login(login_input(PASSWORD)).await.unwrap();
        assert_eq!(session.user.email, EMAIL);
        assert_eq!(session.refresh_token.len(), 64);
        let claims = h.svc.verify_access(session.access_token.as_deref().unwrap()).unwrap();
        assert_eq!(claims.sub, EMAIL);
        assert_eq!(claims.uid, session.user.id);
    }

    #[tokio::test]
    async fn lockout_trips_exactly_at_threshold() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();

        for _ in 0..4 {
            let err = h.svc.login(login_input("Wrong-pass1!")).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }
        // threshold - 1 failures: correct password still works
        h.svc.login(login_input(PASSWORD)).await.unwrap();

        // the window has not moved, so one more failure reaches 5
        let err = h.svc.login(login_input("Wrong-pass1!")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        let err = h.svc.login(login_input(PASSWORD)).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountLocked));
    }

    #[tokio::test]
    async fn locked_attempts_are_not_recorded() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        for _ in 0..5 {
            let _ = h.svc.login(login_input("Wrong-pass1!")).await;
        }
        // many more attempts while locked must not extend the failure count
        for _ in 0..10 {
            let err = h.svc.login(login_input(PASSWORD)).await.unwrap_err();
            assert!(matches!(err, AuthError::AccountLocked));
        }
        let since = Utc::now() - Duration::minutes(15);
        use crate::auth::repository::AttemptStore;
        assert_eq!(h.repo.count_recent_failures(EMAIL, since).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn unverified_email_blocks_login_when_required() {
        let h = harness(configs::AuthSettings { require_verified_email: true, ..settings() });
        h.svc.register(register_input()).await.unwrap();
        let err = h.svc.login(login_input(PASSWORD)).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailNotVerified));

        let token = h.mailer.last_token_for(EMAIL, TokenPurpose::EmailVerification).unwrap();
        h.svc.verify_email(&token).await.unwrap();
        h.svc.login(login_input(PASSWORD)).await.unwrap();
    }

    #[tokio::test]
    async fn verification_token_is_single_use() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let token = h.mailer.last_token_for(EMAIL, TokenPurpose::EmailVerification).unwrap();
        h.svc.verify_email(&token).await.unwrap();
        let err = h.svc.verify_email(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenAlreadyUsed));
    }

    #[tokio::test]
    async fn reissue_invalidates_previous_verification_token() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let first = h.mailer.last_token_for(EMAIL, TokenPurpose::EmailVerification).unwrap();
        h.svc.resend_verification(EMAIL).await.unwrap();
        let second = h.mailer.last_token_for(EMAIL, TokenPurpose::EmailVerification).unwrap();
        assert_ne!(first, second);
        assert_eq!(h.repo.live_token_count(TokenPurpose::EmailVerification), 1);

        let err = h.svc.verify_email(&first).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenAlreadyUsed));
        h.svc.verify_email(&second).await.unwrap();
    }

    #[tokio::test]
    async fn expired_verification_token_classified() {
        let h = harness(configs::AuthSettings {
            // issues tokens already past their expiry
            verification_token_ttl_hours: -1,
            ..settings()
        });
        h.svc.register(register_input()).await.unwrap();
        let token = h.mailer.last_token_for(EMAIL, TokenPurpose::EmailVerification).unwrap();
        let err = h.svc.verify_email(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid_not_leaky() {
        let h = harness(settings());
        let err = h.svc.verify_email(&"f".repeat(64)).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
        let err = h.svc.verify_email("too-short").await.unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[tokio::test]
    async fn concurrent_verification_consumes_exactly_once() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let token = h.mailer.last_token_for(EMAIL, TokenPurpose::EmailVerification).unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let svc = h.svc.clone();
            let token = token.clone();
            handles.push(tokio::spawn(async move { svc.verify_email(&token).await }));
        }
        let mut ok = 0;
        let mut already = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(AuthError::TokenAlreadyUsed) => already += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(already, 7);
    }

    #[tokio::test]
    async fn refresh_rotates_and_reuse_burns_the_family() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let first = h.svc.login(login_input(PASSWORD)).await.unwrap();

        let second = h.svc.refresh(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);

        // replaying the rotated-out token trips reuse detection...
        let err = h.svc.refresh(&first.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionReuseDetected));

        // ...which revokes the whole lineage, including the fresh token
        let err = h.svc.refresh(&second.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionRevoked));
    }

    #[tokio::test]
    async fn logout_revokes_the_family() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let session = h.svc.login(login_input(PASSWORD)).await.unwrap();
        let rotated = h.svc.refresh(&session.refresh_token).await.unwrap();

        h.svc.logout(&rotated.refresh_token).await.unwrap();
        let err = h.svc.refresh(&rotated.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionRevoked));

        // idempotent for unknown tokens
        h.svc.logout(&"0".repeat(64)).await.unwrap();
    }

    #[tokio::test]
    async fn logout_all_cuts_every_device() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let a = h.svc.login(login_input(PASSWORD)).await.unwrap();
        let b = h.svc.login(login_input(PASSWORD)).await.unwrap();
        assert_eq!(h.repo.session_count(), 2);

        let revoked = h.svc.logout_all(a.user.id).await.unwrap();
        assert_eq!(revoked, 2);
        assert!(matches!(
            h.svc.refresh(&a.refresh_token).await.unwrap_err(),
            AuthError::SessionRevoked
        ));
        assert!(matches!(
            h.svc.refresh(&b.refresh_token).await.unwrap_err(),
            AuthError::SessionRevoked
        ));
    }

    #[tokio::test]
    async fn reset_request_for_unknown_email_acks_without_issuing() {
        let h = harness(settings());
        h.svc.request_password_reset("ghost@example.com").await.unwrap();
        assert_eq!(h.mailer.count(), 0);
    }

    #[tokio::test]
    async fn password_reset_replaces_credential_and_revokes_sessions() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        let session = h.svc.login(login_input(PASSWORD)).await.unwrap();

        h.svc.request_password_reset(EMAIL).await.unwrap();
        let token = h.mailer.last_token_for(EMAIL, TokenPurpose::PasswordReset).unwrap();
        h.svc
            .reset_password(ResetPasswordInput { token, new_password: "N3w-password!".into() })
            .await
            .unwrap();

        // the old session family is dead
        assert!(matches!(
            h.svc.refresh(&session.refresh_token).await.unwrap_err(),
            AuthError::SessionRevoked
        ));
        // the old password no longer verifies, the new one does
        assert!(matches!(
            h.svc.login(login_input(PASSWORD)).await.unwrap_err(),
            AuthError::InvalidCredentials
        ));
        h.svc.login(login_input("N3w-password!")).await.unwrap();
    }

    #[tokio::test]
    async fn reset_token_is_single_use() {
        let h = harness(settings());
        h.svc.register(register_input()).await.unwrap();
        h.svc.request_password_reset(EMAIL).await.unwrap();
        let token = h.mailer.last_token_for(EMAIL, TokenPurpose::PasswordReset).unwrap();

        h.svc
            .reset_password(ResetPasswordInput {
                token: token.clone(),
                new_password: "N3w-password!".into(),
            })
            .await
            .unwrap();
        let err = h
            .svc
            .reset_password(ResetPasswordInput { token, new_password: "An0ther-pass!".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenAlreadyUsed));
    }

    #[tokio::test]
    async fn reset_token_cannot_verify_email() {
        let h = harness(configs::AuthSettings { require_verified_email: true, ..settings() });
        h.svc.register(register_input()).await.unwrap();
        h.svc.request_password_reset(EMAIL).await.unwrap();
        let reset = h.mailer.last_token_for(EMAIL, TokenPurpose::PasswordReset).unwrap();

        let err = h.svc.verify_email(&reset).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[tokio::test]
    async fn full_lifecycle_chain() {
        let h = harness(configs::AuthSettings { require_verified_email: true, ..settings() });
        let account = register_and_verify(&h).await;

        let session = h.svc.login(login_input(PASSWORD)).await.unwrap();
        let rotated = h.svc.refresh(&session.refresh_token).await.unwrap();
        assert_eq!(rotated.user.id, account.id);

        h.svc.request_password_reset(EMAIL).await.unwrap();
        let token = h.mailer.last_token_for(EMAIL, TokenPurpose::PasswordReset).unwrap();
        h.svc
            .reset_password(ResetPasswordInput { token, new_password: "Br4nd-new-pass!".into() })
            .await
            .unwrap();

        // every pre-reset refresh token is dead
        assert!(matches!(
            h.svc.refresh(&rotated.refresh_token).await.unwrap_err(),
            AuthError::SessionRevoked
        ));
        let fresh = h.svc.login(login_input("Br4nd-new-pass!")).await.unwrap();
        h.svc.refresh(&fresh.refresh_token).await.unwrap();
    }
}
