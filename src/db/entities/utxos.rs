use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "utxos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub txid: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub vout: i64,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub value: i64,
    pub block_height: i64,
    pub spent: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub spent_txid: Option<String>,
    pub spent_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text")]
    pub script_pubkey: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
