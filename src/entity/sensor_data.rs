use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One reading from a node's two sensors. Rows are never updated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensor_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub node_id: String,
    pub timestamp: DateTimeUtc,
    pub temp_1: Option<f64>,
    pub hum_1: Option<f64>,
    pub temp_2: Option<f64>,
    pub hum_2: Option<f64>,
    pub mold_index: Option<f64>,
    pub drift_val: Option<f64>,
    pub system_health: Option<String>,
    pub risk_level: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
