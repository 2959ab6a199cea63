// Persistence layer: connection pool, entities, and the UTXO repositories

pub mod entities;
pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DbError;
pub use pool::DbPool;
pub use repositories::{MemoryUtxoRepository, PostgresUtxoRepository, UtxoRepository, UtxoStore};
