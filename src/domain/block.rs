// Block wire model and the identity rules applied to it

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A candidate block as submitted over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub height: i64,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

/// Reference to a previous output. Coinbase inputs carry an all-zero
/// `txId` and an arbitrary index that is never dereferenced, so the
/// index is wide enough to hold whatever the producer put there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxInput {
    #[serde(rename = "txId")]
    pub tx_id: String,
    pub index: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: String,
    pub value: u64,
}

/// Normalize a transaction id to the 64-character form used for hashing
/// and for every store key: right-pad with '0', truncate past 64.
pub fn pad64(id: &str) -> String {
    let mut out: String = id.chars().take(64).collect();
    let mut len = out.chars().count();
    while len < 64 {
        out.push('0');
        len += 1;
    }
    out
}

/// A coinbase reference is one or more '0' characters and nothing else.
/// A single "0" qualifies; width 64 is not required.
pub fn is_coinbase_ref(tx_id: &str) -> bool {
    !tx_id.is_empty() && tx_id.bytes().all(|b| b == b'0')
}

/// The id a block must declare: SHA-256 over the decimal height followed
/// by the padded id of every transaction, in order, rendered as lowercase
/// hex.
pub fn compute_block_id(height: i64, transactions: &[Transaction]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(height.to_string().as_bytes());
    for tx in transactions {
        hasher.update(pad64(&tx.id).as_bytes());
    }
    hex::encode(hasher.finalize())
}
