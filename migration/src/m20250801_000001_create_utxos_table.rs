use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per transaction output ever created; spends flip the
        // spent columns instead of deleting so rollback can restore them.
        manager
            .create_table(
                Table::create()
                    .table(Utxos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Utxos::Txid).string_len(64).not_null())
                    .col(ColumnDef::new(Utxos::Vout).big_integer().not_null())
                    .col(ColumnDef::new(Utxos::Address).text().not_null())
                    .col(ColumnDef::new(Utxos::Value).big_integer().not_null())
                    .col(ColumnDef::new(Utxos::BlockHeight).big_integer().not_null())
                    .col(
                        ColumnDef::new(Utxos::Spent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Utxos::SpentTxid).string_len(64).null())
                    .col(ColumnDef::new(Utxos::SpentAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Utxos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Utxos::ScriptPubkey)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .primary_key(Index::create().col(Utxos::Txid).col(Utxos::Vout))
                    .to_owned(),
            )
            .await?;

        // Index for balance lookups: address + spent flag
        manager
            .create_index(
                Index::create()
                    .name("idx_utxos_address_spent")
                    .table(Utxos::Table)
                    .col(Utxos::Address)
                    .col(Utxos::Spent)
                    .to_owned(),
            )
            .await?;

        // Index for rollback unspend pass
        manager
            .create_index(
                Index::create()
                    .name("idx_utxos_spent_txid")
                    .table(Utxos::Table)
                    .col(Utxos::SpentTxid)
                    .to_owned(),
            )
            .await?;

        // Index for tip derivation and height-range deletes
        manager
            .create_index(
                Index::create()
                    .name("idx_utxos_block_height")
                    .table(Utxos::Table)
                    .col(Utxos::BlockHeight)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Utxos::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Utxos {
    Table,
    Txid,
    Vout,
    Address,
    Value,
    BlockHeight,
    Spent,
    SpentTxid,
    SpentAt,
    CreatedAt,
    ScriptPubkey,
}
