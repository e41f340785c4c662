use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use service::auth::repo::SeaOrmAuthRepository;
use service::auth::AuthService;
use service::mailer::LogMailer;

use server::routes::{self, ServerState};

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn test_settings() -> configs::AuthSettings {
    configs::AuthSettings {
        jwt_secret: Some("test-secret".into()),
        require_verified_email: false,
        // minimum argon2 cost so the suite stays fast
        argon2_memory_kib: 8,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..Default::default()
    }
}

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
    let auth = AuthService::new(repo, test_settings(), Arc::new(LogMailer))
        .map_err(|e| anyhow::anyhow!("auth setup: {e}"))?;
    let state = ServerState { db, auth: Arc::new(auth) };
    Ok(routes::build_router(state, cors()))
}

fn post_json(uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

async fn body_json(resp: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn register_login_me_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";

    let resp = app
        .clone()
        .call(post_json("/auth/register", &json!({"email": email, "password": password}))?)
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .call(post_json("/auth/login", &json!({"email": email, "password": password}))?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("set-cookie").is_some());
    let body = body_json(resp).await?;
    let access = body["access_token"].as_str().expect("access token").to_string();
    assert_eq!(body["user"]["email"], email.to_lowercase());

    let req = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .header("authorization", format!("Bearer {access}"))
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await?;
    assert_eq!(me["email"], email.to_lowercase());
    Ok(())
}

#[tokio::test]
async fn me_without_token_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;
    let req = Request::builder().method("GET").uri("/auth/me").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_wrong_password_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let _ = app
        .clone()
        .call(post_json("/auth/register", &json!({"email": email, "password": "StrongPass1!"}))?)
        .await?;

    let resp = app
        .clone()
        .call(post_json("/auth/login", &json!({"email": email, "password": "WrongPass1!"}))?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn register_weak_password_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;
    let resp = app
        .clone()
        .call(post_json(
            "/auth/register",
            &json!({"email": format!("weak_{}@example.com", Uuid::new_v4()), "password": "short"}),
        )?)
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await?;
    assert!(body["error"]["fields"].is_array());
    Ok(())
}

#[tokio::test]
async fn refresh_rotates_and_burns_old_token() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "R0tate!Pass";
    let _ = app
        .clone()
        .call(post_json("/auth/register", &json!({"email": email, "password": password}))?)
        .await?;
    let resp = app
        .clone()
        .call(post_json("/auth/login", &json!({"email": email, "password": password}))?)
        .await?;
    let login = body_json(resp).await?;
    let first = login["refresh_token"].as_str().expect("refresh token").to_string();

    let resp = app
        .clone()
        .call(post_json("/auth/refresh", &json!({"refresh_token": first}))?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated = body_json(resp).await?;
    let second = rotated["refresh_token"].as_str().expect("rotated token").to_string();
    assert_ne!(first, second);

    // replaying the consumed token burns the whole family
    let resp = app
        .clone()
        .call(post_json("/auth/refresh", &json!({"refresh_token": first}))?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // the rotated descendant dies with it
    let resp = app
        .clone()
        .call(post_json("/auth/refresh", &json!({"refresh_token": second}))?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
