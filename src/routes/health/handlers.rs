use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder, TransactionTrait};

use crate::common::AppState;
use crate::entity::health_reports;
use crate::error::{AppError, AppResult};
use crate::payload::HealthReportCreate;
use crate::routes::Ack;
use crate::services::nodes::{NodeUpdate, upsert_node};

use super::types::LatestHealthResponse;

/// Ingest a network health report
///
/// Every node named in `nodes` is created if unknown, and takes its `status`
/// and drift status (`sensors`) from the report where present.
#[utoipa::path(
    post,
    path = "/api/health/",
    request_body = HealthReportCreate,
    responses(
        (status = 201, description = "Health report stored", body = Ack),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Missing fields, or a nodes entry that is not an object"),
    ),
    tag = "health"
)]
pub async fn ingest_health(
    State(state): State<AppState>,
    payload: Result<Json<HealthReportCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Ack>)> {
    let Json(payload) = payload?;

    // Validate every entry before opening the transaction
    let entries = payload.node_entries().map_err(AppError::InvalidPayload)?;
    if let Some(blank) = entries.iter().find(|e| e.node_id.trim().is_empty()) {
        return Err(AppError::InvalidPayload(format!(
            "nodes: invalid node id {:?}",
            blank.node_id
        )));
    }

    let txn = state.db.begin().await?;

    let row = health_reports::ActiveModel {
        timestamp: Set(Utc::now()),
        network: Set(serde_json::Value::Object(payload.network.clone())),
        nodes: Set(serde_json::Value::Object(payload.nodes.clone())),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for entry in &entries {
        upsert_node(
            &txn,
            entry.node_id,
            NodeUpdate {
                last_seen: None,
                status: entry.status,
                drift_status: entry.drift_status,
            },
        )
        .await?;
    }

    txn.commit().await?;

    tracing::debug!(id = row.id, nodes = entries.len(), "health_report_ingested");

    Ok(Ack::created())
}

/// Get the most recent health report
///
/// Returns `{}` when no report has been ingested yet.
#[utoipa::path(
    get,
    path = "/api/health/latest",
    responses(
        (status = 200, description = "Latest report, or an empty object", body = LatestHealthResponse),
    ),
    tag = "health"
)]
pub async fn latest_health(State(state): State<AppState>) -> AppResult<Json<LatestHealthResponse>> {
    let latest = health_reports::Entity::find()
        .order_by_desc(health_reports::Column::Timestamp)
        .order_by_desc(health_reports::Column::Id)
        .one(&state.db)
        .await?;

    Ok(Json(latest.map(LatestHealthResponse::from).unwrap_or_default()))
}
