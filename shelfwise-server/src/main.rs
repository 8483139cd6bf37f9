//! Shelfwise Server - REST API for reading lists

use anyhow::Result;
use shelfwise_server::{routes, state};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelfwise_server=debug,shelfwise_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = state::Config::from_env()?;
    let state = state::AppState::new(&config).await?;
    let app = routes::create_router(state, config.cors_origins.as_deref());

    tracing::info!("Serving {} on {}", config.data_dir.display(), config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
