mod common;

use common::{block, services, tx, TestServices};
use utxo_indexer::db::UtxoRepository;
use utxo_indexer::error::IndexerError;

/// The three-block chain from the rollback walkthrough: a mint, a full
/// spend, then a partial spend of the second generation.
async fn seed_three_blocks(svc: &TestServices) {
    svc.ingest
        .process_block(&block(1, vec![tx("tx1", &[("0", 0)], &[("addr1", 10)])]))
        .await
        .unwrap();
    svc.ingest
        .process_block(&block(
            2,
            vec![tx("tx2", &[("tx1", 0)], &[("addr2", 4), ("addr3", 6)])],
        ))
        .await
        .unwrap();
    svc.ingest
        .process_block(&block(
            3,
            vec![tx(
                "tx3",
                &[("tx2", 1)],
                &[("addr4", 2), ("addr5", 2), ("addr6", 2)],
            )],
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn rollback_restores_spent_outputs_and_drops_created_ones() {
    let svc = services();
    seed_three_blocks(&svc).await;

    svc.rollback.rollback_to_height(2).await.unwrap();

    assert_eq!(svc.balance.get_balance("addr1").await.unwrap(), 0);
    assert_eq!(svc.balance.get_balance("addr2").await.unwrap(), 4);
    assert_eq!(svc.balance.get_balance("addr3").await.unwrap(), 6);
    assert_eq!(svc.balance.get_balance("addr4").await.unwrap(), 0);
    assert_eq!(svc.balance.get_balance("addr5").await.unwrap(), 0);
    assert_eq!(svc.balance.get_balance("addr6").await.unwrap(), 0);
    assert_eq!(svc.store.tip_height().await.unwrap(), 2);
}

#[tokio::test]
async fn rollback_to_zero_empties_the_store() {
    let svc = services();
    seed_three_blocks(&svc).await;

    svc.rollback.rollback_to_height(0).await.unwrap();

    assert_eq!(svc.store.tip_height().await.unwrap(), 0);
    assert!(svc.store.find_above(0).await.unwrap().is_empty());

    // The chain restarts from height 1 as if nothing had happened
    svc.ingest
        .process_block(&block(1, vec![tx("tx9", &[("0", 0)], &[("fresh", 5)])]))
        .await
        .unwrap();
    assert_eq!(svc.balance.get_balance("fresh").await.unwrap(), 5);
}

#[tokio::test]
async fn rollback_matches_a_chain_never_extended() {
    // Ingest B1..B3, rewind to 1, and compare against a store that only
    // ever saw B1
    let rolled = services();
    seed_three_blocks(&rolled).await;
    rolled.rollback.rollback_to_height(1).await.unwrap();

    let fresh = services();
    fresh
        .ingest
        .process_block(&block(1, vec![tx("tx1", &[("0", 0)], &[("addr1", 10)])]))
        .await
        .unwrap();

    for address in ["addr1", "addr2", "addr3", "addr4", "addr5", "addr6"] {
        assert_eq!(
            rolled.balance.get_balance(address).await.unwrap(),
            fresh.balance.get_balance(address).await.unwrap(),
            "divergence at {}",
            address
        );
    }
    assert_eq!(rolled.store.tip_height().await.unwrap(), 1);

    // And the rewound chain accepts the same continuation
    rolled
        .ingest
        .process_block(&block(
            2,
            vec![tx("tx2b", &[("tx1", 0)], &[("addr7", 10)])],
        ))
        .await
        .unwrap();
    assert_eq!(rolled.balance.get_balance("addr7").await.unwrap(), 10);
}

#[tokio::test]
async fn rollback_at_tip_fails_and_changes_nothing() {
    let svc = services();
    seed_three_blocks(&svc).await;

    let err = svc.rollback.rollback_to_height(3).await.unwrap_err();
    assert!(matches!(
        err,
        IndexerError::NoBlocksToRollback { target: 3, current: 3 }
    ));
    assert_eq!(
        err.to_string(),
        "Cannot rollback to height 3: no blocks exist above this height. Current height is 3."
    );

    // Repeatable: the failure is stable and state never moves
    let err = svc.rollback.rollback_to_height(3).await.unwrap_err();
    assert!(matches!(err, IndexerError::NoBlocksToRollback { .. }));
    assert_eq!(svc.store.tip_height().await.unwrap(), 3);
    assert_eq!(svc.balance.get_balance("addr4").await.unwrap(), 2);
}

#[tokio::test]
async fn rollback_on_an_empty_chain_reports_it() {
    let svc = services();

    let err = svc.rollback.rollback_to_height(0).await.unwrap_err();
    assert!(matches!(
        err,
        IndexerError::NoBlocksToRollback { target: 0, current: 0 }
    ));
    assert_eq!(
        err.to_string(),
        "Cannot rollback to height 0: no blocks exist in the chain."
    );
}

#[tokio::test]
async fn rollback_above_tip_is_invalid() {
    let svc = services();
    svc.ingest
        .process_block(&block(1, vec![tx("tx1", &[("0", 0)], &[("addr1", 10)])]))
        .await
        .unwrap();
    svc.ingest
        .process_block(&block(2, vec![tx("tx2", &[("tx1", 0)], &[("addr2", 10)])]))
        .await
        .unwrap();

    let err = svc.rollback.rollback_to_height(999).await.unwrap_err();
    assert!(matches!(
        err,
        IndexerError::InvalidRollbackHeight { target: 999, current: 2 }
    ));
}

#[tokio::test]
async fn negative_rollback_target_is_invalid() {
    let svc = services();

    let err = svc.rollback.rollback_to_height(-1).await.unwrap_err();
    assert!(matches!(
        err,
        IndexerError::InvalidRollbackHeight { target: -1, .. }
    ));
}

#[tokio::test]
async fn unspend_only_touches_outputs_spent_by_removed_blocks() {
    let svc = services();

    // Two parallel coinbase lineages; only one is spent above the target
    svc.ingest
        .process_block(&block(
            1,
            vec![
                tx("mint-a", &[("0", 0)], &[("a", 10)]),
                tx("mint-b", &[("00", 0)], &[("b", 20)]),
            ],
        ))
        .await
        .unwrap();
    svc.ingest
        .process_block(&block(2, vec![tx("spend-a", &[("mint-a", 0)], &[("c", 10)])]))
        .await
        .unwrap();
    svc.ingest
        .process_block(&block(3, vec![tx("spend-b", &[("mint-b", 0)], &[("d", 20)])]))
        .await
        .unwrap();

    svc.rollback.rollback_to_height(2).await.unwrap();

    // b's mint is unspent again; a's spend at height 2 survives
    assert_eq!(svc.balance.get_balance("a").await.unwrap(), 0);
    assert_eq!(svc.balance.get_balance("b").await.unwrap(), 20);
    assert_eq!(svc.balance.get_balance("c").await.unwrap(), 10);
    assert_eq!(svc.balance.get_balance("d").await.unwrap(), 0);
}
