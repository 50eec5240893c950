/*
 * Responsibility
 * - tracing 初期化
 * - Config読み込み → AppState 生成 → Router 組み立て
 * - Middleware の適用 (http 共通層 / 管理者ガードは routes 側)
 * - axum::serve() で起動
 */
use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, error, middleware, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,admin_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("load configuration")?;

    // never log the prefix or the key themselves
    tracing::info!(
        addr = %config.addr,
        path_prefix_len = config.admin_path_prefix.len(),
        "starting admin-gate"
    );

    let state = AppState::from_config(&config);
    let app = middleware::http::apply(build_router(state), &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes(state.clone()))
        .fallback(error::not_found)
        .with_state(state)
}
