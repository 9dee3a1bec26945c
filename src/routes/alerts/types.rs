use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::alerts;

/// Stored alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlertResponse {
    pub id: i32,
    pub node_id: String,
    /// Server time at ingestion
    pub timestamp: DateTime<Utc>,
    pub alert_level: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub metrics: serde_json::Value,
}

impl From<alerts::Model> for AlertResponse {
    fn from(a: alerts::Model) -> Self {
        Self {
            id: a.id,
            node_id: a.node_id,
            timestamp: a.timestamp,
            alert_level: a.alert_level,
            message: a.message,
            metrics: a.metrics,
        }
    }
}
