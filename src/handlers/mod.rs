// API endpoint handlers implementation

mod balance;
mod blocks;
mod health;
mod rollback;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, Router};

use crate::services::{BalanceService, IngestService, RollbackService};
use crate::sync::WriteGate;

// Handler function re-exports
pub use balance::get_balance;
pub use blocks::submit_block;
pub use health::health_check;
pub use rollback::rollback_chain;

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestService>,
    pub rollback: Arc<RollbackService>,
    pub balance: Arc<BalanceService>,
    pub gate: WriteGate,
    pub default_gate_ttl: Duration,
}

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/blocks", post(submit_block))
        .route("/balance/{address}", get(get_balance))
        .route("/rollback", post(rollback_chain))
        .with_state(state)
}
