#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use utxo_indexer::db::UtxoStore;
use utxo_indexer::domain::{compute_block_id, Block, Transaction, TxInput, TxOutput};
use utxo_indexer::handlers::AppState;
use utxo_indexer::services::{BalanceService, IngestService, RollbackService};
use utxo_indexer::sync::WriteGate;

/// Services wired over a fresh in-memory store.
pub struct TestServices {
    pub store: Arc<UtxoStore>,
    pub ingest: IngestService,
    pub rollback: RollbackService,
    pub balance: BalanceService,
}

pub fn services() -> TestServices {
    let store = Arc::new(UtxoStore::memory());
    TestServices {
        ingest: IngestService::new(Arc::clone(&store)),
        rollback: RollbackService::new(Arc::clone(&store)),
        balance: BalanceService::new(Arc::clone(&store)),
        store,
    }
}

/// Application state over a fresh in-memory store, for router-level tests.
pub fn app_state() -> AppState {
    let store = Arc::new(UtxoStore::memory());
    AppState {
        ingest: Arc::new(IngestService::new(Arc::clone(&store))),
        rollback: Arc::new(RollbackService::new(Arc::clone(&store))),
        balance: Arc::new(BalanceService::new(Arc::clone(&store))),
        gate: WriteGate::new(),
        default_gate_ttl: Duration::from_millis(5000),
    }
}

pub fn tx(id: &str, inputs: &[(&str, i64)], outputs: &[(&str, u64)]) -> Transaction {
    Transaction {
        id: id.to_string(),
        inputs: inputs
            .iter()
            .map(|(tx_id, index)| TxInput {
                tx_id: tx_id.to_string(),
                index: *index,
            })
            .collect(),
        outputs: outputs
            .iter()
            .map(|(address, value)| TxOutput {
                address: address.to_string(),
                value: *value,
            })
            .collect(),
    }
}

/// Build a block whose declared id satisfies the identity rule.
pub fn block(height: i64, transactions: Vec<Transaction>) -> Block {
    let id = compute_block_id(height, &transactions);
    Block {
        id,
        height,
        transactions,
    }
}
