// Domain model: wire-format blocks and the UTXO records derived from them

pub mod block;
pub mod utxo;

pub use block::{compute_block_id, is_coinbase_ref, pad64, Block, Transaction, TxInput, TxOutput};
pub use utxo::{NewUtxo, UtxoRecord};
