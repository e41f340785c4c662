use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{
    Account, AuthSession, LoginInput, RefreshInput, RegisterInput, RequestPasswordResetInput,
    ResendVerificationInput, ResetPasswordInput, Role, VerifyEmailInput,
};
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::tokens::Claims;
use service::auth::AuthService;
use service::validation::ValidateRequest;

use crate::errors::ApiError;

const ACCESS_COOKIE: &str = "access_token";
const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
}

#[derive(Serialize)]
pub struct AccountOut {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub email_verified: bool,
}

impl From<&Account> for AccountOut {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            email: a.email.clone(),
            role: a.role.clone(),
            email_verified: a.email_verified_at.is_some(),
        }
    }
}

#[derive(Serialize)]
pub struct SessionOut {
    pub user: AccountOut,
    pub access_token: Option<String>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<&AuthSession> for SessionOut {
    fn from(s: &AuthSession) -> Self {
        Self {
            user: AccountOut::from(&s.user),
            access_token: s.access_token.clone(),
            refresh_token: s.refresh_token.clone(),
            refresh_expires_at: s.refresh_expires_at,
        }
    }
}

fn http_cookie(name: &'static str, value: String, path: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_path(path);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Attach the token pair as HttpOnly cookies. The refresh cookie is scoped
/// to /auth so it only travels on auth calls.
fn session_cookies(jar: CookieJar, session: &AuthSession) -> CookieJar {
    let jar = match &session.access_token {
        Some(token) => jar.add(http_cookie(ACCESS_COOKIE, token.clone(), "/")),
        None => jar,
    };
    jar.add(http_cookie(REFRESH_COOKIE, session.refresh_token.clone(), "/auth"))
}

fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    let mut access = Cookie::from(ACCESS_COOKIE);
    access.set_path("/");
    let mut refresh = Cookie::from(REFRESH_COOKIE);
    refresh.set_path("/auth");
    jar.remove(access).remove(refresh)
}

fn client_addr(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

fn refresh_token_from(jar: &CookieJar, body: Option<RefreshInput>) -> Result<String, ApiError> {
    body.map(|b| b.refresh_token)
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()))
        .ok_or_else(|| ApiError::bad_request("missing refresh token"))
}

/// Bearer middleware for the protected routes. Accepts an Authorization
/// header, falling back to the access-token cookie, and injects the verified
/// claims for handlers.
pub async fn require_bearer(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string());
    let token = header_token
        .or_else(|| jar.get(ACCESS_COOKIE).map(|c| c.value().to_string()))
        .ok_or_else(|| {
            ApiError::new(StatusCode::UNAUTHORIZED, 1100, "missing bearer token")
        })?;

    let claims = state.auth.verify_access(&token).map_err(|e| {
        tracing::warn!(path = %req.uri().path(), err = %e, "bearer token rejected");
        ApiError::new(StatusCode::UNAUTHORIZED, 1100, "invalid bearer token")
    })?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[utoipa::path(post, path = "/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AccountOut>), ApiError> {
    input.validate().map_err(ApiError::validation)?;
    let account = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(AccountOut::from(&account))))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified"),
        (status = 423, description = "Account locked")))]
pub async fn login(
    State(state): State<ServerState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(mut input): Json<LoginInput>,
) -> Result<(CookieJar, Json<SessionOut>), ApiError> {
    input.validate().map_err(ApiError::validation)?;
    input.client_addr = client_addr(&headers);
    let session = state.auth.login(input).await?;
    let jar = session_cookies(jar, &session);
    Ok((jar, Json(SessionOut::from(&session))))
}

#[utoipa::path(post, path = "/auth/refresh", tag = "auth",
    request_body = crate::openapi::RefreshRequest,
    responses((status = 200, description = "Rotated"),
        (status = 401, description = "Session expired, revoked, or reused")))]
pub async fn refresh(
    State(state): State<ServerState>,
    jar: CookieJar,
    body: Option<Json<RefreshInput>>,
) -> Result<(CookieJar, Json<SessionOut>), ApiError> {
    let token = refresh_token_from(&jar, body.map(|Json(b)| b))?;
    let session = state.auth.refresh(&token).await?;
    let jar = session_cookies(jar, &session);
    Ok((jar, Json(SessionOut::from(&session))))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth",
    responses((status = 204, description = "Logged out")))]
pub async fn logout(
    State(state): State<ServerState>,
    jar: CookieJar,
    body: Option<Json<RefreshInput>>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    if let Ok(token) = refresh_token_from(&jar, body.map(|Json(b)| b)) {
        state.auth.logout(&token).await?;
    }
    Ok((clear_session_cookies(jar), StatusCode::NO_CONTENT))
}

#[utoipa::path(post, path = "/auth/logout-all", tag = "auth",
    responses((status = 204, description = "All sessions revoked"),
        (status = 401, description = "Unauthorized")))]
pub async fn logout_all(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    state.auth.logout_all(claims.uid).await?;
    Ok((clear_session_cookies(jar), StatusCode::NO_CONTENT))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth",
    responses((status = 200, description = "Current account"),
        (status = 401, description = "Unauthorized")))]
pub async fn me(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AccountOut>, ApiError> {
    let account = state
        .auth
        .account(claims.uid)
        .await?
        .ok_or_else(|| ApiError::not_found("account not found"))?;
    Ok(Json(AccountOut::from(&account)))
}

#[utoipa::path(post, path = "/auth/verify-email", tag = "auth",
    request_body = crate::openapi::VerifyEmailRequest,
    responses((status = 204, description = "Verified"),
        (status = 400, description = "Token invalid or expired"),
        (status = 409, description = "Token already used")))]
pub async fn verify_email(
    State(state): State<ServerState>,
    Json(input): Json<VerifyEmailInput>,
) -> Result<StatusCode, ApiError> {
    input.validate().map_err(ApiError::validation)?;
    state.auth.verify_email(&input.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/auth/verify-email/resend", tag = "auth",
    request_body = crate::openapi::EmailRequest,
    responses((status = 202, description = "Accepted")))]
pub async fn resend_verification(
    State(state): State<ServerState>,
    Json(input): Json<ResendVerificationInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    input.validate().map_err(ApiError::validation)?;
    state.auth.resend_verification(&input.email).await?;
    // identical ack whether or not the address has an account
    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "status": "ok" }))))
}

#[utoipa::path(post, path = "/auth/password-reset/request", tag = "auth",
    request_body = crate::openapi::EmailRequest,
    responses((status = 202, description = "Accepted")))]
pub async fn password_reset_request(
    State(state): State<ServerState>,
    Json(input): Json<RequestPasswordResetInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    input.validate().map_err(ApiError::validation)?;
    state.auth.request_password_reset(&input.email).await?;
    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "status": "ok" }))))
}

#[utoipa::path(post, path = "/auth/password-reset/confirm", tag = "auth",
    request_body = crate::openapi::ResetPasswordRequest,
    responses((status = 204, description = "Password replaced"),
        (status = 400, description = "Token invalid or expired"),
        (status = 409, description = "Token already used")))]
pub async fn password_reset_confirm(
    State(state): State<ServerState>,
    Json(input): Json<ResetPasswordInput>,
) -> Result<StatusCode, ApiError> {
    input.validate().map_err(ApiError::validation)?;
    state.auth.reset_password(input).await?;
    Ok(StatusCode::NO_CONTENT)
}
