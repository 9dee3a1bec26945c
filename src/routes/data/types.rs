use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity::sensor_data;

fn default_format() -> String {
    "json".to_string()
}

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Node to read history for
    pub node_id: String,
    /// Maximum number of rows (1-2000, default 200); the most recent rows are kept
    pub limit: Option<i64>,
    /// Response format: json (default) or csv
    #[serde(default = "default_format")]
    pub format: String,
}

/// One reading in chronological history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryRow {
    pub timestamp: DateTime<Utc>,
    pub node_id: String,
    pub temp_1: Option<f64>,
    pub hum_1: Option<f64>,
    pub temp_2: Option<f64>,
    pub hum_2: Option<f64>,
    pub mold_index: Option<f64>,
    pub drift_val: Option<f64>,
    pub system_health: Option<String>,
    pub risk_level: Option<i32>,
}

impl HistoryRow {
    /// CSV column names, in field order.
    pub const CSV_HEADER: [&'static str; 10] = [
        "timestamp",
        "node_id",
        "temp_1",
        "hum_1",
        "temp_2",
        "hum_2",
        "mold_index",
        "drift_val",
        "system_health",
        "risk_level",
    ];
}

impl From<sensor_data::Model> for HistoryRow {
    fn from(r: sensor_data::Model) -> Self {
        Self {
            timestamp: r.timestamp,
            node_id: r.node_id,
            temp_1: r.temp_1,
            hum_1: r.hum_1,
            temp_2: r.temp_2,
            hum_2: r.hum_2,
            mold_index: r.mold_index,
            drift_val: r.drift_val,
            system_health: r.system_health,
            risk_level: r.risk_level,
        }
    }
}
