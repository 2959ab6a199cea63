use std::sync::Arc;

use crate::db::{UtxoRepository, UtxoStore};
use crate::error::{IndexerError, IndexerResult};

/// Reverses every effect of the blocks above a target height: outputs
/// they created are deleted, outputs they consumed become unspent again.
/// Runs under the write gate.
pub struct RollbackService {
    store: Arc<UtxoStore>,
}

impl RollbackService {
    pub fn new(store: Arc<UtxoStore>) -> Self {
        Self { store }
    }

    pub async fn rollback_to_height(&self, target: i64) -> IndexerResult<()> {
        let current = self.store.tip_height().await?;

        if target < 0 || target > current {
            return Err(IndexerError::InvalidRollbackHeight { target, current });
        }

        let victims = self.store.find_above(target).await?;
        if victims.is_empty() {
            return Err(IndexerError::NoBlocksToRollback { target, current });
        }

        // The victims' producing transactions are exactly the spenders
        // whose spends must be undone. Capture the set before deleting
        // the rows it is derived from.
        let mut spending_txids: Vec<String> = victims.into_iter().map(|v| v.txid).collect();
        spending_txids.sort();
        spending_txids.dedup();

        let restored = self
            .store
            .unspend_by_spending_txids(&spending_txids)
            .await?;
        let deleted = self.store.delete_above(target).await?;

        tracing::info!(
            target,
            previous_tip = current,
            restored,
            deleted,
            "chain rolled back"
        );
        Ok(())
    }
}
