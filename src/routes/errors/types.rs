use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::error_logs;

/// Stored node error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorLogResponse {
    pub id: i32,
    pub node_id: String,
    pub timestamp: DateTime<Utc>,
    pub error_code: String,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
}

impl From<error_logs::Model> for ErrorLogResponse {
    fn from(e: error_logs::Model) -> Self {
        Self {
            id: e.id,
            node_id: e.node_id,
            timestamp: e.timestamp,
            error_code: e.error_code,
            details: e.details,
        }
    }
}
