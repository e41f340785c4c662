use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use migration::{Migrator, MigratorTrait};
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::AuthService;
use service::mailer::LogMailer;

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: load config, connect, migrate, build the app, serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = configs::AppConfig::load_and_validate()?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await?;
    info!("migrations applied");

    let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
    let auth = Arc::new(AuthService::new(repo, cfg.auth.clone(), Arc::new(LogMailer))?);
    let state = ServerState { db, auth };

    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
