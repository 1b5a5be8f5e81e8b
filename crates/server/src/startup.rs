use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use axum::Router;
use common::env::ensure_env;
use configs::AppConfig;
use service::auth::TokenService;
use service::store::Database;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

const DEV_TOKEN_SECRET: &str = "dev-secret-change-me";

/// Credentialed CORS for an explicit origin list; request headers are mirrored.
pub fn build_cors(origins: &[String]) -> Result<CorsLayer, StartupError> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|e| StartupError::InvalidConfig(format!("cors origin {o:?}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Open the collections and the token service described by `cfg`.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    ensure_env(&cfg.database.data_dir).await?;
    let db = Database::open(&cfg.database.data_dir, &cfg.database.name)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;

    let secret = match cfg.auth.token_secret.as_deref() {
        Some(s) => s.to_owned(),
        None => {
            warn!("ACCESS_TOKEN_SECRET not set; using the development secret");
            DEV_TOKEN_SECRET.to_owned()
        }
    };
    let tokens = TokenService::with_ttl_hours(&secret, cfg.auth.token_ttl_hours);
    Ok(ServerState::new(db, tokens, cfg.auth.cookie_name.clone()))
}

pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    let cors = build_cors(&cfg.cors.allowed_origins)?;
    Ok(routes::build_router(state, cors))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = format!("{}:{}", cfg.server.host, cfg.server.port);
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(err = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: build the app and run the HTTP server until ctrl-c.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Any(anyhow::anyhow!("bind {addr}: {e}")))?;
    info!(%addr, origins = ?cfg.cors.allowed_origins, "car doctor server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!("server stopped");
    Ok(())
}
