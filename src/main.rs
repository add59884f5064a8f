// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use portal::config::Config;
use portal::routes;
use portal::seed::seed_demo;
use portal::state::AppState;
use portal::store::postgres::PgStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "portal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let state = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;
            AppState::with_store(Arc::new(store), config.clone())
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store (data is not persisted)");
            AppState::in_memory(config.clone())
        }
    };

    if config.seed_demo {
        if let Err(e) = seed_demo(state.catalog.as_ref(), &config.demo_lesson_token).await {
            tracing::error!("Failed to seed demo data: {}", e);
        }
    }

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
