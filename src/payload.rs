//! Ingestion payloads as they travel over the wire.
//!
//! The server deserializes these from request bodies and the sample feeder
//! serializes them, so both ends share one definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::timestamp::deserialize_utc;

/// Open mapping used for freeform fields (`metrics`, `details`, `network`, `nodes`).
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Body of `POST /api/data/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SensorDataCreate {
    pub node_id: String,
    /// ISO-8601; converted to UTC, offset-less values taken as UTC
    #[serde(deserialize_with = "deserialize_utc")]
    pub timestamp: DateTime<Utc>,
    pub readings: Readings,
    pub status: ReadingStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Readings {
    #[serde(default)]
    pub sensor_1: SensorReading,
    #[serde(default)]
    pub sensor_2: SensorReading,
    pub mold_index: Option<f64>,
    pub drift_val: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SensorReading {
    pub temp: Option<f64>,
    pub hum: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReadingStatus {
    pub system_health: Option<String>,
    pub risk_level: Option<i32>,
}

/// Body of `POST /api/alerts/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertCreate {
    pub node_id: String,
    pub alert_level: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub metrics: JsonMap,
}

/// Body of `POST /api/errors/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorCreate {
    pub node_id: String,
    pub error_code: String,
    #[schema(value_type = Object)]
    pub details: JsonMap,
}

/// Body of `POST /api/health/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthReportCreate {
    #[schema(value_type = Object)]
    pub network: JsonMap,
    /// node_id -> `{"status": ..., "sensors": ...}`
    #[schema(value_type = Object)]
    pub nodes: JsonMap,
}

/// Status fields one health report carries for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHealthEntry<'a> {
    pub node_id: &'a str,
    pub status: Option<&'a str>,
    /// Reported as `sensors` on the wire, stored as the node's drift status
    pub drift_status: Option<&'a str>,
}

impl HealthReportCreate {
    /// Extract the per-node status entries.
    ///
    /// Non-string `status`/`sensors` values count as absent.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first node whose entry is not a mapping.
    pub fn node_entries(&self) -> Result<Vec<NodeHealthEntry<'_>>, String> {
        self.nodes
            .iter()
            .map(|(node_id, info)| {
                let info = info
                    .as_object()
                    .ok_or_else(|| format!("nodes.{node_id}: expected an object"))?;
                Ok(NodeHealthEntry {
                    node_id,
                    status: info.get("status").and_then(serde_json::Value::as_str),
                    drift_status: info.get("sensors").and_then(serde_json::Value::as_str),
                })
            })
            .collect()
    }
}
