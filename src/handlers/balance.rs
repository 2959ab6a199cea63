// Handler for address balance queries

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::IndexerResult;
use crate::handlers::AppState;
use crate::models::BalanceResponse;

/// Handler for GET /balance/{address} - sums unspent value for the
/// address; reads are not serialized by the write gate
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> IndexerResult<Json<BalanceResponse>> {
    let balance = state.balance.get_balance(&address).await?;
    Ok(Json(BalanceResponse { balance }))
}
