// Handler for block submission

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};

use crate::domain::Block;
use crate::error::IndexerResult;
use crate::handlers::AppState;
use crate::models::{gate_ttl, SuccessResponse};

/// Handler for POST /blocks - validates and ingests one candidate block
/// while holding the write gate
pub async fn submit_block(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(block): Json<Block>,
) -> IndexerResult<Json<SuccessResponse>> {
    let ttl = gate_ttl(&headers, state.default_gate_ttl)?;

    let _guard = state.gate.acquire(ttl).await?;
    state.ingest.process_block(&block).await?;

    Ok(Json(SuccessResponse { success: true }))
}
