// Main entry point for the upload server

use anyhow::{Context, Result};
use server_core::{
    server::{build_app, AppState},
    store::connect_store,
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server_core=debug,hostname_extraction=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting scanner hostname extraction server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        netbios_miss_policy = %config.netbios_miss_policy,
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    // Connect to record store (creates the table if missing)
    tracing::info!("Connecting to record store...");
    let store = connect_store(&config.database_url).await?;
    tracing::info!("Record store ready");

    let state = AppState::new(store, &config);
    let app = build_app(state, config.max_upload_bytes);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Upload form: http://localhost:{}/", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
