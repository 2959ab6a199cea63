use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::error::DbError;
use crate::db::repositories::UtxoRepository;
use crate::domain::{NewUtxo, UtxoRecord};

/// In-memory UTXO store honoring the same contract as the Postgres one.
/// Backs the test suite and `MEMORY_DB=true` runs.
#[derive(Clone)]
pub struct MemoryUtxoRepository {
    // (txid, vout) -> record
    rows: Arc<RwLock<HashMap<(String, i64), UtxoRecord>>>,
}

impl MemoryUtxoRepository {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryUtxoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UtxoRepository for MemoryUtxoRepository {
    async fn insert(&self, utxo: NewUtxo) -> Result<(), DbError> {
        let mut rows = self.rows.write().await;
        let key = (utxo.txid.clone(), utxo.vout);

        if rows.contains_key(&key) {
            return Err(DbError::Query(format!(
                "duplicate key (txid, vout) = ({}, {})",
                utxo.txid, utxo.vout
            )));
        }

        rows.insert(
            key,
            UtxoRecord {
                txid: utxo.txid,
                vout: utxo.vout,
                address: utxo.address,
                value: utxo.value,
                block_height: utxo.block_height,
                spent: false,
                spent_txid: None,
                spent_at: None,
                created_at: Utc::now(),
                script_pubkey: utxo.script_pubkey,
            },
        );

        Ok(())
    }

    async fn find_unspent(&self, refs: &[(String, i64)]) -> Result<Vec<UtxoRecord>, DbError> {
        let rows = self.rows.read().await;
        let mut seen: HashSet<&(String, i64)> = HashSet::new();
        let mut found = Vec::new();

        // Each distinct reference yields at most one record
        for key in refs {
            if !seen.insert(key) {
                continue;
            }
            if let Some(record) = rows.get(key) {
                if !record.spent {
                    found.push(record.clone());
                }
            }
        }

        Ok(found)
    }

    async fn mark_spent(&self, txid: &str, vout: i64, spending_txid: &str) -> Result<(), DbError> {
        let mut rows = self.rows.write().await;
        let key = (txid.to_string(), vout);

        match rows.get_mut(&key) {
            Some(record) if !record.spent => {
                record.spent = true;
                record.spent_txid = Some(spending_txid.to_string());
                record.spent_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(DbError::UtxoNotFound {
                txid: txid.to_string(),
                vout,
            }),
        }
    }

    async fn balance(&self, address: &str) -> Result<i64, DbError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|r| !r.spent && r.address == address)
            .map(|r| r.value)
            .sum())
    }

    async fn tip_height(&self) -> Result<i64, DbError> {
        let rows = self.rows.read().await;
        Ok(rows.values().map(|r| r.block_height).max().unwrap_or(0))
    }

    async fn find_above(&self, height: i64) -> Result<Vec<UtxoRecord>, DbError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|r| r.block_height > height)
            .cloned()
            .collect())
    }

    async fn unspend_by_spending_txids(&self, txids: &[String]) -> Result<u64, DbError> {
        if txids.is_empty() {
            return Ok(0);
        }

        let spenders: HashSet<&String> = txids.iter().collect();
        let mut rows = self.rows.write().await;
        let mut restored = 0u64;

        for record in rows.values_mut() {
            let spent_by_victim = record
                .spent_txid
                .as_ref()
                .is_some_and(|id| spenders.contains(id));
            if record.spent && spent_by_victim {
                record.spent = false;
                record.spent_txid = None;
                record.spent_at = None;
                restored += 1;
            }
        }

        Ok(restored)
    }

    async fn delete_above(&self, height: i64) -> Result<u64, DbError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, r| r.block_height <= height);
        Ok((before - rows.len()) as u64)
    }
}
