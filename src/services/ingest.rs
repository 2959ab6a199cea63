use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{DbError, UtxoRepository, UtxoStore};
use crate::domain::{compute_block_id, is_coinbase_ref, pad64, Block, NewUtxo, Transaction};
use crate::error::{IndexerError, IndexerResult};

/// Validates candidate blocks and applies their effects to the UTXO set.
/// Callers hold the write gate for the whole operation; validation runs
/// entirely against pre-block state, so nothing is written until every
/// check has passed.
pub struct IngestService {
    store: Arc<UtxoStore>,
}

impl IngestService {
    pub fn new(store: Arc<UtxoStore>) -> Self {
        Self { store }
    }

    pub async fn process_block(&self, block: &Block) -> IndexerResult<()> {
        self.check_height(block).await?;
        for tx in &block.transactions {
            self.check_conservation(tx).await?;
        }
        check_identity(block)?;

        self.apply(block).await?;

        tracing::info!(
            height = block.height,
            transactions = block.transactions.len(),
            "block accepted"
        );
        Ok(())
    }

    /// The chain is strictly linear: the only admissible height is tip + 1.
    async fn check_height(&self, block: &Block) -> IndexerResult<()> {
        let tip = self.store.tip_height().await?;
        let expected = tip + 1;
        if block.height != expected {
            return Err(IndexerError::InvalidBlockHeight {
                got: block.height,
                expected,
            });
        }
        Ok(())
    }

    /// Input/output conservation for one transaction, judged against the
    /// store as it stood before this block. Outputs created earlier in
    /// the same block are invisible here, so sibling spends fail.
    async fn check_conservation(&self, tx: &Transaction) -> IndexerResult<()> {
        let output_sum = sum_outputs(tx)?;

        let has_coinbase = tx.inputs.iter().any(|i| is_coinbase_ref(&i.tx_id));
        let has_regular = tx.inputs.iter().any(|i| !is_coinbase_ref(&i.tx_id));

        if has_coinbase && has_regular {
            return Err(IndexerError::InvalidInputOutputSum(format!(
                "transaction {} mixes coinbase and regular inputs",
                tx.id
            )));
        }

        // Coinbase transactions mint: their outputs answer to no input sum.
        if has_coinbase {
            return Ok(());
        }

        if tx.inputs.is_empty() {
            if output_sum != 0 {
                return Err(IndexerError::InvalidInputOutputSum(format!(
                    "transaction {} has no inputs but a non-zero output sum",
                    tx.id
                )));
            }
            return Ok(());
        }

        let refs: Vec<(String, i64)> = tx
            .inputs
            .iter()
            .map(|i| (pad64(&i.tx_id), i.index))
            .collect();
        let rows = self.store.find_unspent(&refs).await?;
        let by_ref: HashMap<(String, i64), i64> = rows
            .into_iter()
            .map(|r| ((r.txid.clone(), r.vout), r.value))
            .collect();

        let mut input_sum: i64 = 0;
        for reference in &refs {
            let value = by_ref.get(reference).ok_or_else(|| {
                IndexerError::InvalidInputOutputSum(format!(
                    "transaction {} references a missing or spent output {}:{}",
                    tx.id, reference.0, reference.1
                ))
            })?;
            input_sum = input_sum.checked_add(*value).ok_or_else(|| {
                IndexerError::InvalidInputOutputSum(format!(
                    "transaction {} input sum overflows",
                    tx.id
                ))
            })?;
        }

        if input_sum != output_sum {
            return Err(IndexerError::InvalidInputOutputSum(format!(
                "transaction {} inputs total {} but outputs total {}",
                tx.id, input_sum, output_sum
            )));
        }

        Ok(())
    }

    /// Write phase: spend inputs, then create outputs, transaction by
    /// transaction in block order. Store faults here abort the request.
    async fn apply(&self, block: &Block) -> IndexerResult<()> {
        for tx in &block.transactions {
            let spender = pad64(&tx.id);

            for input in &tx.inputs {
                if is_coinbase_ref(&input.tx_id) {
                    continue;
                }
                let txid = pad64(&input.tx_id);
                if let Err(err) = self.store.mark_spent(&txid, input.index, &spender).await {
                    if matches!(err, DbError::UtxoNotFound { .. }) {
                        tracing::error!(
                            height = block.height,
                            txid = %txid,
                            vout = input.index,
                            "validated input vanished during apply"
                        );
                    }
                    return Err(err.into());
                }
            }

            for (vout, output) in tx.outputs.iter().enumerate() {
                self.store
                    .insert(NewUtxo {
                        txid: spender.clone(),
                        vout: vout as i64,
                        address: output.address.clone(),
                        value: output.value as i64,
                        block_height: block.height,
                        script_pubkey: String::new(),
                    })
                    .await?;
            }
        }

        Ok(())
    }
}

/// Checked output total. Each value must fit the store's signed 64-bit
/// column, and the running sum must not overflow it.
fn sum_outputs(tx: &Transaction) -> IndexerResult<i64> {
    let mut sum: i64 = 0;
    for output in &tx.outputs {
        let value = i64::try_from(output.value).map_err(|_| {
            IndexerError::InvalidInputOutputSum(format!(
                "transaction {} output value {} exceeds the representable range",
                tx.id, output.value
            ))
        })?;
        sum = sum.checked_add(value).ok_or_else(|| {
            IndexerError::InvalidInputOutputSum(format!(
                "transaction {} output sum overflows",
                tx.id
            ))
        })?;
    }
    Ok(sum)
}

/// A block's declared id must equal the digest of its height and its
/// transaction ids.
fn check_identity(block: &Block) -> IndexerResult<()> {
    let expected = compute_block_id(block.height, &block.transactions);
    if block.id != expected {
        return Err(IndexerError::InvalidBlockId {
            got: block.id.clone(),
            expected,
        });
    }
    Ok(())
}
