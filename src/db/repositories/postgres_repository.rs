use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Set,
    Statement,
};
use std::fmt;

use crate::db::entities::utxos;
use crate::db::error::DbError;
use crate::db::repositories::UtxoRepository;
use crate::domain::{NewUtxo, UtxoRecord};

const SELECT_COLUMNS: &str = "txid, vout, address, value, block_height, spent, spent_txid, spent_at, created_at, script_pubkey";

/// Postgres-backed UTXO store
#[derive(Clone)]
pub struct PostgresUtxoRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for PostgresUtxoRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresUtxoRepository").finish_non_exhaustive()
    }
}

/// Row returned from utxos queries
#[derive(Debug, FromQueryResult)]
struct UtxoRow {
    txid: String,
    vout: i64,
    address: String,
    value: i64,
    block_height: i64,
    spent: bool,
    spent_txid: Option<String>,
    spent_at: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    created_at: sea_orm::prelude::DateTimeWithTimeZone,
    script_pubkey: String,
}

impl From<UtxoRow> for UtxoRecord {
    fn from(row: UtxoRow) -> Self {
        UtxoRecord {
            txid: row.txid,
            vout: row.vout,
            address: row.address,
            value: row.value,
            block_height: row.block_height,
            spent: row.spent,
            spent_txid: row.spent_txid,
            spent_at: row.spent_at.map(|t| t.with_timezone(&Utc)),
            created_at: row.created_at.with_timezone(&Utc),
            script_pubkey: row.script_pubkey,
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

impl PostgresUtxoRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn fetch_rows(&self, sql: String) -> Result<Vec<UtxoRecord>, DbError> {
        let rows = UtxoRow::find_by_statement(Statement::from_string(DbBackend::Postgres, sql))
            .all(&self.conn)
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(rows.into_iter().map(UtxoRecord::from).collect())
    }
}

#[async_trait]
impl UtxoRepository for PostgresUtxoRepository {
    async fn insert(&self, utxo: NewUtxo) -> Result<(), DbError> {
        let model = utxos::ActiveModel {
            txid: Set(utxo.txid),
            vout: Set(utxo.vout),
            address: Set(utxo.address),
            value: Set(utxo.value),
            block_height: Set(utxo.block_height),
            spent: Set(false),
            spent_txid: Set(None),
            spent_at: Set(None),
            created_at: Set(Utc::now().into()),
            script_pubkey: Set(utxo.script_pubkey),
        };

        model.insert(&self.conn).await?;
        Ok(())
    }

    async fn find_unspent(&self, refs: &[(String, i64)]) -> Result<Vec<UtxoRecord>, DbError> {
        if refs.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::with_capacity(refs.len());
        for chunk in refs.chunks(200) {
            let conditions: Vec<String> = chunk
                .iter()
                .map(|(txid, vout)| format!("(txid = '{}' AND vout = {})", escape(txid), vout))
                .collect();

            let sql = format!(
                "SELECT {} FROM utxos WHERE spent = FALSE AND ({})",
                SELECT_COLUMNS,
                conditions.join(" OR ")
            );

            records.extend(self.fetch_rows(sql).await?);
        }

        Ok(records)
    }

    async fn mark_spent(&self, txid: &str, vout: i64, spending_txid: &str) -> Result<(), DbError> {
        let sql = format!(
            "UPDATE utxos SET spent = TRUE, spent_txid = '{}', spent_at = NOW() WHERE txid = '{}' AND vout = {} AND spent = FALSE",
            escape(spending_txid),
            escape(txid),
            vout
        );

        let result = self
            .conn
            .execute(Statement::from_string(DbBackend::Postgres, sql))
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DbError::UtxoNotFound {
                txid: txid.to_string(),
                vout,
            });
        }

        Ok(())
    }

    async fn balance(&self, address: &str) -> Result<i64, DbError> {
        // SUM over BIGINT widens to NUMERIC, so cast back before reading
        let sql = format!(
            "SELECT COALESCE(SUM(value), 0)::BIGINT AS total FROM utxos WHERE address = '{}' AND spent = FALSE",
            escape(address)
        );

        let result = self
            .conn
            .query_one(Statement::from_string(DbBackend::Postgres, sql))
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;

        match result {
            Some(row) => row
                .try_get("", "total")
                .map_err(|e| DbError::Query(e.to_string())),
            None => Ok(0),
        }
    }

    async fn tip_height(&self) -> Result<i64, DbError> {
        let sql = "SELECT COALESCE(MAX(block_height), 0) AS tip FROM utxos".to_string();

        let result = self
            .conn
            .query_one(Statement::from_string(DbBackend::Postgres, sql))
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;

        match result {
            Some(row) => row
                .try_get("", "tip")
                .map_err(|e| DbError::Query(e.to_string())),
            None => Ok(0),
        }
    }

    async fn find_above(&self, height: i64) -> Result<Vec<UtxoRecord>, DbError> {
        let sql = format!(
            "SELECT {} FROM utxos WHERE block_height > {}",
            SELECT_COLUMNS, height
        );
        self.fetch_rows(sql).await
    }

    async fn unspend_by_spending_txids(&self, txids: &[String]) -> Result<u64, DbError> {
        if txids.is_empty() {
            return Ok(0);
        }

        let mut total_restored = 0u64;
        for chunk in txids.chunks(200) {
            let id_list: Vec<String> = chunk.iter().map(|id| format!("'{}'", escape(id))).collect();

            let sql = format!(
                "UPDATE utxos SET spent = FALSE, spent_txid = NULL, spent_at = NULL WHERE spent = TRUE AND spent_txid IN ({})",
                id_list.join(", ")
            );

            let result = self
                .conn
                .execute(Statement::from_string(DbBackend::Postgres, sql))
                .await
                .map_err(|e| DbError::Query(e.to_string()))?;

            total_restored += result.rows_affected();
        }

        Ok(total_restored)
    }

    async fn delete_above(&self, height: i64) -> Result<u64, DbError> {
        let sql = format!("DELETE FROM utxos WHERE block_height > {}", height);

        let result = self
            .conn
            .execute(Statement::from_string(DbBackend::Postgres, sql))
            .await
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
