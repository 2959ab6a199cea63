// Handler for chain rollback

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};

use crate::error::IndexerResult;
use crate::handlers::AppState;
use crate::models::{gate_ttl, RollbackQuery, SuccessResponse};

/// Handler for POST /rollback?height=N - rewinds the chain to the target
/// height while holding the write gate
pub async fn rollback_chain(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RollbackQuery>,
) -> IndexerResult<Json<SuccessResponse>> {
    let ttl = gate_ttl(&headers, state.default_gate_ttl)?;

    let _guard = state.gate.acquire(ttl).await?;
    state.rollback.rollback_to_height(params.height).await?;

    Ok(Json(SuccessResponse { success: true }))
}
