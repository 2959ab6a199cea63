use thiserror::Error;

/// Error type for store operations
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    SeaOrm(#[from] sea_orm::DbErr),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(String),
    /// `mark_spent` found no matching unspent row.
    #[error("UTXO not found: {txid}:{vout}")]
    UtxoNotFound { txid: String, vout: i64 },
}
