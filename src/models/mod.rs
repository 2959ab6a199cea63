// API request/response models

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{IndexerError, IndexerResult};

/// Response body for accepted writes
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response body for GET /balance/{address}
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

/// Query parameters for POST /rollback
#[derive(Debug, Deserialize)]
pub struct RollbackQuery {
    pub height: i64,
}

/// Per-request override for the write gate TTL
pub const BLOCK_TTL_HEADER: &str = "x-block-ttl";

/// Resolve the gate TTL for a write request. Absent header means the
/// configured default; a present header must be a positive integer
/// millisecond count.
pub fn gate_ttl(headers: &HeaderMap, default: Duration) -> IndexerResult<Duration> {
    let raw = match headers.get(BLOCK_TTL_HEADER) {
        None => return Ok(default),
        Some(raw) => raw,
    };

    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|ms| *ms > 0)
        .map(|ms| Duration::from_millis(ms as u64))
        .ok_or(IndexerError::InvalidTtlHeader)
}
