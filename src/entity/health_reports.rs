use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of network and per-node connectivity, stored verbatim.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "health_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub timestamp: DateTimeUtc,
    #[sea_orm(column_type = "Json")]
    pub network: Json,
    #[sea_orm(column_type = "Json")]
    pub nodes: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
