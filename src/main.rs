use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

use vouchnet::api::{create_identity_router, ApiState};
use vouchnet::config::IdentityConfig;
use vouchnet::engine::IdentityService;
use vouchnet::storage::{MemoryStorage, SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    let config = IdentityConfig::from_env().context("Failed to load configuration")?;
    init_logging(&config)?;

    info!("Starting identity reputation service");

    let storage: Arc<dyn Storage> = match &config.storage.path {
        Some(path) => {
            info!(path = %path, "Using SQLite storage");
            Arc::new(
                SqliteStorage::open(path)
                    .await
                    .with_context(|| format!("Failed to open database at {path}"))?,
            )
        }
        None => {
            info!("Using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    };

    let service = Arc::new(IdentityService::new(storage));
    let app = create_identity_router(ApiState { service }).layer(TraceLayer::new_for_http());

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;

    info!("Identity service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize logging from the configured level
fn init_logging(config: &IdentityConfig) -> Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(if config.logging.log_requests {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set logging subscriber: {}", e))?;

    Ok(())
}
