use chrono::{DateTime, Utc};

/// One unspent (or spent-and-retained) transaction output as held by the
/// store. `txid` is always the padded 64-character form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoRecord {
    pub txid: String,
    pub vout: i64,
    pub address: String,
    pub value: i64,
    pub block_height: i64,
    pub spent: bool,
    pub spent_txid: Option<String>,
    pub spent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub script_pubkey: String,
}

/// Insert payload for a freshly created output.
#[derive(Debug, Clone)]
pub struct NewUtxo {
    pub txid: String,
    pub vout: i64,
    pub address: String,
    pub value: i64,
    pub block_height: i64,
    pub script_pubkey: String,
}
