use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use insight_server::config::{AppConfig, StoreBackend};
use insight_server::database::{MemoryRecordStore, PgRecordStore, RecordStore};
use insight_server::middleware::cors_layer;
use insight_server::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DB_USER, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!("Starting inSight server in {:?} mode", config.environment);

    // The Postgres pool is owned here and released once serving stops
    let (store, pg): (Arc<dyn RecordStore>, Option<PgRecordStore>) = match config.database.backend {
        StoreBackend::Postgres => {
            let pg = PgRecordStore::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            pg.ensure_collections().await.context("failed to prepare collections")?;
            let store: Arc<dyn RecordStore> = Arc::new(pg.clone());
            (store, Some(pg))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
            (store, None)
        }
    };

    let state = AppState::new(store, &config).context("failed to build application state")?;

    let router = app(state)
        .layer(cors_layer(&config.security.cors_origins))
        .layer(TraceLayer::new_for_http());

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("inSight is running on {}", bind_addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error");

    if let Some(pg) = pg {
        pg.close().await;
    }

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
