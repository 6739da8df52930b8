//! Binary entrypoint: boots the Axum HTTP server, wiring the report store,
//! the research agent, and the web routes.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use searchbrief::{build_agent, create_router, AppConfig, AppState, ReportStore};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("searchbrief=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env()?;
    if !config.missing_keys().is_empty() {
        tracing::warn!(missing = ?config.missing_keys(), "credentials absent; runs will fail");
    }

    let store = ReportStore::connect(&config.database_url).await?;
    store.init().await?;

    let agent = build_agent(&config);
    let state = AppState::new(store, agent, &config);
    let router = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await.context("serving")?;
    Ok(())
}
