use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;

/// Failure kinds surfaced by the indexing core. The boundary maps each
/// kind to a status code; the body is always `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Invalid block height {got}: expected {expected}")]
    InvalidBlockHeight { got: i64, expected: i64 },
    #[error("Invalid input/output sum: {0}")]
    InvalidInputOutputSum(String),
    #[error("Invalid block id {got}: expected {expected}")]
    InvalidBlockId { got: String, expected: String },
    #[error("Invalid rollback height {target}: current height is {current}")]
    InvalidRollbackHeight { target: i64, current: i64 },
    #[error("{}", no_blocks_message(.target, .current))]
    NoBlocksToRollback { target: i64, current: i64 },
    #[error("Failed to acquire write lock within the allotted time")]
    MutexTimeout,
    #[error("Invalid x-block-ttl header value")]
    InvalidTtlHeader,
    #[error("UTXO not found: {0}")]
    #[allow(dead_code)] // Reserved: mark_spent misses surface as DatabaseError instead
    UtxoNotFound(String),
    #[error("Address not found: {0}")]
    #[allow(dead_code)] // Reserved: unknown addresses report a zero balance
    AddressNotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

fn no_blocks_message(target: &i64, current: &i64) -> String {
    if *current == 0 {
        format!(
            "Cannot rollback to height {}: no blocks exist in the chain.",
            target
        )
    } else {
        format!(
            "Cannot rollback to height {}: no blocks exist above this height. Current height is {}.",
            target, current
        )
    }
}

pub type IndexerResult<T> = Result<T, IndexerError>;

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        let status = match self {
            IndexerError::InvalidBlockHeight { .. }
            | IndexerError::InvalidInputOutputSum(_)
            | IndexerError::InvalidBlockId { .. }
            | IndexerError::InvalidRollbackHeight { .. }
            | IndexerError::NoBlocksToRollback { .. }
            | IndexerError::InvalidTtlHeader => StatusCode::BAD_REQUEST,
            IndexerError::MutexTimeout => StatusCode::REQUEST_TIMEOUT,
            IndexerError::UtxoNotFound(_) | IndexerError::AddressNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            IndexerError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let err_msg = self.to_string();
        if status.is_server_error() {
            tracing::error!("request failed: {}", err_msg);
        } else {
            tracing::warn!("request rejected: {}", err_msg);
        }

        let body = Json(json!({
            "error": err_msg
        }));

        (status, body).into_response()
    }
}

// Store failures collapse into DatabaseError at the core boundary. A
// missing row during mark_spent is unreachable while the write gate is
// held; if the store reports one anyway it is a store fault, not a
// client error.
impl From<DbError> for IndexerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UtxoNotFound { txid, vout } => IndexerError::DatabaseError(format!(
                "attempted to spend missing or already-spent output {}:{}",
                txid, vout
            )),
            other => IndexerError::DatabaseError(other.to_string()),
        }
    }
}
