use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status given to a node on first sighting when the creating call supplies none.
pub const DEFAULT_STATUS: &str = "ONLINE";
/// Drift status given to a node on first sighting.
pub const DEFAULT_DRIFT_STATUS: &str = "SYNCED";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub node_id: String,
    pub last_seen: DateTimeUtc,
    pub status: String,
    pub drift_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
