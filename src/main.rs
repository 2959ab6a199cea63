// UTXO indexer server entry point

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http::{header, Method};
use migration::{Migrator, MigratorTrait};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utxo_indexer::config::AppConfig;
use utxo_indexer::db::{DbPool, UtxoStore};
use utxo_indexer::handlers::{create_router, AppState};
use utxo_indexer::services::{BalanceService, IngestService, RollbackService};
use utxo_indexer::sync::WriteGate;

#[tokio::main]
async fn main() {
    // Configure logging with tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Invalid configuration");
    tracing::info!("Configuration loaded");

    // Select the backing store and bring its schema up to date
    let store = if config.memory_db {
        tracing::info!("Using in-memory store (MEMORY_DB=true)");
        UtxoStore::memory()
    } else {
        let database_url = config
            .database_url
            .as_deref()
            .expect("DATABASE_URL must be set");
        let db_pool = DbPool::new(database_url)
            .await
            .expect("Failed to connect to database");
        Migrator::up(db_pool.get_connection(), None)
            .await
            .expect("Failed to apply database migrations");
        tracing::info!("Connected to database");
        UtxoStore::postgres(db_pool.get_connection().clone())
    };

    // Wire the services around the shared store and the write gate
    let store = Arc::new(store);
    let state = AppState {
        ingest: Arc::new(IngestService::new(Arc::clone(&store))),
        rollback: Arc::new(RollbackService::new(Arc::clone(&store))),
        balance: Arc::new(BalanceService::new(Arc::clone(&store))),
        gate: WriteGate::new(),
        default_gate_ttl: Duration::from_millis(config.gate_ttl_ms),
    };

    // Configure CORS policy
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Parse server address from config
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");

    // Start HTTP server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

/// Resolve when the process is asked to stop, so in-flight writes can
/// finish before the listener closes.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut stream = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");
        stream.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
