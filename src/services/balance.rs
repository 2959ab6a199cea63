use std::sync::Arc;

use crate::db::{UtxoRepository, UtxoStore};
use crate::error::IndexerResult;

/// Sums unspent value per address. Reads bypass the write gate; the
/// store answers with whatever state the last committed writer left.
pub struct BalanceService {
    store: Arc<UtxoStore>,
}

impl BalanceService {
    pub fn new(store: Arc<UtxoStore>) -> Self {
        Self { store }
    }

    /// Unknown addresses are simply worth zero.
    pub async fn get_balance(&self, address: &str) -> IndexerResult<i64> {
        Ok(self.store.balance(address).await?)
    }
}
