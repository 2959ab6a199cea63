mod memory_repository;
mod postgres_repository;

pub use memory_repository::MemoryUtxoRepository;
pub use postgres_repository::PostgresUtxoRepository;

use async_trait::async_trait;
use std::sync::Arc;

use crate::db::error::DbError;
use crate::domain::{NewUtxo, UtxoRecord};

/// Store contract for the UTXO set. Every backing that honors these
/// eight operations can sit under the services, including the in-memory
/// one used by the test suite.
#[async_trait]
pub trait UtxoRepository: Send + Sync {
    /// Add one output. Violating `(txid, vout)` uniqueness is an error.
    async fn insert(&self, utxo: NewUtxo) -> Result<(), DbError>;

    /// Return the unspent record for each `(txid, vout)` reference that
    /// has one. Result order is unspecified; empty input yields empty
    /// output.
    async fn find_unspent(&self, refs: &[(String, i64)]) -> Result<Vec<UtxoRecord>, DbError>;

    /// Flip one unspent row to spent, stamping the spender and the spend
    /// time. `UtxoNotFound` when the row is missing or already spent.
    async fn mark_spent(&self, txid: &str, vout: i64, spending_txid: &str) -> Result<(), DbError>;

    /// Sum of unspent values held by `address`; 0 when none.
    async fn balance(&self, address: &str) -> Result<i64, DbError>;

    /// Highest block height present, or 0 for an empty store.
    async fn tip_height(&self) -> Result<i64, DbError>;

    /// All rows created above `height`.
    async fn find_above(&self, height: i64) -> Result<Vec<UtxoRecord>, DbError>;

    /// Clear the spend columns on every row spent by one of `txids`.
    /// Returns the number of rows restored; empty input is a no-op.
    async fn unspend_by_spending_txids(&self, txids: &[String]) -> Result<u64, DbError>;

    /// Delete every row created above `height`. Returns the count removed.
    async fn delete_above(&self, height: i64) -> Result<u64, DbError>;
}

/// Dispatch wrapper over the configured backing store
pub enum UtxoStore {
    Memory(Arc<MemoryUtxoRepository>),
    Postgres(Arc<PostgresUtxoRepository>),
}

impl UtxoStore {
    pub fn memory() -> Self {
        UtxoStore::Memory(Arc::new(MemoryUtxoRepository::new()))
    }

    pub fn postgres(conn: sea_orm::DatabaseConnection) -> Self {
        UtxoStore::Postgres(Arc::new(PostgresUtxoRepository::new(conn)))
    }
}

#[async_trait]
impl UtxoRepository for UtxoStore {
    async fn insert(&self, utxo: NewUtxo) -> Result<(), DbError> {
        match self {
            UtxoStore::Memory(r) => r.insert(utxo).await,
            UtxoStore::Postgres(r) => r.insert(utxo).await,
        }
    }

    async fn find_unspent(&self, refs: &[(String, i64)]) -> Result<Vec<UtxoRecord>, DbError> {
        match self {
            UtxoStore::Memory(r) => r.find_unspent(refs).await,
            UtxoStore::Postgres(r) => r.find_unspent(refs).await,
        }
    }

    async fn mark_spent(&self, txid: &str, vout: i64, spending_txid: &str) -> Result<(), DbError> {
        match self {
            UtxoStore::Memory(r) => r.mark_spent(txid, vout, spending_txid).await,
            UtxoStore::Postgres(r) => r.mark_spent(txid, vout, spending_txid).await,
        }
    }

    async fn balance(&self, address: &str) -> Result<i64, DbError> {
        match self {
            UtxoStore::Memory(r) => r.balance(address).await,
            UtxoStore::Postgres(r) => r.balance(address).await,
        }
    }

    async fn tip_height(&self) -> Result<i64, DbError> {
        match self {
            UtxoStore::Memory(r) => r.tip_height().await,
            UtxoStore::Postgres(r) => r.tip_height().await,
        }
    }

    async fn find_above(&self, height: i64) -> Result<Vec<UtxoRecord>, DbError> {
        match self {
            UtxoStore::Memory(r) => r.find_above(height).await,
            UtxoStore::Postgres(r) => r.find_above(height).await,
        }
    }

    async fn unspend_by_spending_txids(&self, txids: &[String]) -> Result<u64, DbError> {
        match self {
            UtxoStore::Memory(r) => r.unspend_by_spending_txids(txids).await,
            UtxoStore::Postgres(r) => r.unspend_by_spending_txids(txids).await,
        }
    }

    async fn delete_above(&self, height: i64) -> Result<u64, DbError> {
        match self {
            UtxoStore::Memory(r) => r.delete_above(height).await,
            UtxoStore::Postgres(r) => r.delete_above(height).await,
        }
    }
}
