use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Latest known state of one node, combined with its most recent reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NodeOverview {
    pub node_id: String,
    pub last_seen: DateTime<Utc>,
    /// Stored status, or OFFLINE when the node has not been seen recently
    pub status: String,
    pub drift_status: String,
    pub temp_1: Option<f64>,
    pub hum_1: Option<f64>,
    pub temp_2: Option<f64>,
    pub hum_2: Option<f64>,
    pub mold_index: Option<f64>,
    pub risk_level: Option<i32>,
}
