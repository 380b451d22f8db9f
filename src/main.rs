use clap::Parser;
use fasterapi::app::{AppState, create_app};
use fasterapi::config::Config;
use fasterapi::database::create_engine;
use fasterapi::models;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fasterapi=info")),
        )
        .init();

    let config = Config::parse();

    let engine = create_engine(&config.database_url, config.engine_options()).await?;

    let mut tx = engine.begin().await?;
    models::metadata().create_all(&mut tx).await?;
    tx.commit().await?;
    tracing::info!("Database setup complete");

    let app = create_app(AppState::new(engine.clone()));
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    engine.dispose().await;
    Ok(())
}
