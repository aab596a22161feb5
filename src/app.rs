/*
 * Responsibility
 * - Config読み込み → 依存生成 (course store, staging area) → Router 組み立て
 * - Middleware の適用 (request id / trace / body limit / timeout)
 * - axum::serve() で起動
 */
use std::{panic, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware::http::{self, HttpLimits};
use crate::repos::DiskCourseStore;
use crate::services::StagingArea;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,autograder_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    // Never abort: unwinding drops request-scoped guards (staged upload directories) and
    // CatchPanicLayer turns the panic into a 500.
    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook();

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let limits = HttpLimits {
        max_body_bytes: config.max_body_bytes,
        timeout: config.request_timeout,
    };
    let app = build_router(state, limits);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let store = DiskCourseStore::open(&config.courses_dir)
        .await
        .with_context(|| format!("failed to open course store {}", config.courses_dir.display()))?;

    let staging = StagingArea::new(&config.upload_dir);

    tracing::info!(
        courses = %config.courses_dir.display(),
        uploads = %staging.root().display(),
        "course store ready"
    );

    // No LMS backend is wired in by default; lms endpoints answer "not linked" until one is.
    Ok(AppState::new(Arc::new(store), staging))
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    http::apply(router, limits)
}
