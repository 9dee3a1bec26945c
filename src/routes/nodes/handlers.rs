use axum::{Json, extract::State};
use chrono::{DateTime, TimeDelta, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::common::AppState;
use crate::entity::{nodes, sensor_data};
use crate::error::AppResult;

use super::types::NodeOverview;

pub const OFFLINE: &str = "OFFLINE";

/// Status to report for a node: OFFLINE once more than `offline_after` has
/// passed since `last_seen`, the stored status otherwise.
#[must_use]
pub fn effective_status(
    stored: &str,
    last_seen: DateTime<Utc>,
    now: DateTime<Utc>,
    offline_after: TimeDelta,
) -> String {
    if now.signed_duration_since(last_seen) > offline_after {
        OFFLINE.to_string()
    } else {
        stored.to_string()
    }
}

/// Per-node overview
///
/// One row per node that has at least one reading, ordered by node id.
/// Nodes known only from alerts, errors or health reports are left out.
#[utoipa::path(
    get,
    path = "/api/nodes/overview",
    responses(
        (status = 200, description = "Overview retrieved successfully", body = Vec<NodeOverview>),
    ),
    tag = "nodes"
)]
pub async fn overview(State(state): State<AppState>) -> AppResult<Json<Vec<NodeOverview>>> {
    let now = Utc::now();
    let offline_after =
        TimeDelta::try_minutes(state.config.node_offline_after_minutes).unwrap_or(TimeDelta::MAX);

    let nodes_list = nodes::Entity::find()
        .order_by_asc(nodes::Column::NodeId)
        .all(&state.db)
        .await?;

    let mut response = Vec::with_capacity(nodes_list.len());
    for node in nodes_list {
        let Some(latest) = sensor_data::Entity::find()
            .filter(sensor_data::Column::NodeId.eq(node.node_id.as_str()))
            .order_by_desc(sensor_data::Column::Timestamp)
            .order_by_desc(sensor_data::Column::Id)
            .one(&state.db)
            .await?
        else {
            continue;
        };

        response.push(NodeOverview {
            status: effective_status(&node.status, node.last_seen, now, offline_after),
            node_id: node.node_id,
            last_seen: node.last_seen,
            drift_status: node.drift_status,
            temp_1: latest.temp_1,
            hum_1: latest.hum_1,
            temp_2: latest.temp_2,
            hum_2: latest.hum_2,
            mold_index: latest.mold_index,
            risk_level: latest.risk_level,
        });
    }

    Ok(Json(response))
}
