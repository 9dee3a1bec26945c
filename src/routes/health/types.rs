use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::health_reports;

/// Latest health report. Serializes to `{}` when no report exists yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatestHealthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub network: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub nodes: Option<serde_json::Value>,
}

impl From<health_reports::Model> for LatestHealthResponse {
    fn from(hr: health_reports::Model) -> Self {
        Self {
            timestamp: Some(hr.timestamp),
            network: Some(hr.network),
            nodes: Some(hr.nodes),
        }
    }
}
