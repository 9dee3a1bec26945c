use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::common::AppState;
use crate::entity::alerts;
use crate::error::AppResult;
use crate::payload::AlertCreate;
use crate::routes::{
    Ack, RECENT_LIMIT_DEFAULT, RECENT_LIMIT_MAX, RecentQuery, require_node_id, resolve_limit,
};
use crate::services::nodes::{NodeUpdate, upsert_node};

use super::types::AlertResponse;

/// Ingest an alert raised by a node
///
/// The alert is timestamped with server time and the node's `last_seen` is
/// refreshed to the same instant.
#[utoipa::path(
    post,
    path = "/api/alerts/",
    request_body = AlertCreate,
    responses(
        (status = 201, description = "Alert stored", body = Ack),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Missing or mistyped fields"),
    ),
    tag = "alerts"
)]
pub async fn ingest_alert(
    State(state): State<AppState>,
    payload: Result<Json<AlertCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Ack>)> {
    let Json(payload) = payload?;
    require_node_id(&payload.node_id)?;

    let now = Utc::now();
    let txn = state.db.begin().await?;

    upsert_node(&txn, &payload.node_id, NodeUpdate::seen(now)).await?;

    let row = alerts::ActiveModel {
        node_id: Set(payload.node_id),
        timestamp: Set(now),
        alert_level: Set(payload.alert_level),
        message: Set(payload.message),
        metrics: Set(serde_json::Value::Object(payload.metrics)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::debug!(
        id = row.id,
        node_id = %row.node_id,
        alert_level = %row.alert_level,
        "alert_ingested"
    );

    Ok(Ack::created())
}

/// List the most recent alerts, newest first
#[utoipa::path(
    get,
    path = "/api/alerts/recent",
    params(RecentQuery),
    responses(
        (status = 200, description = "Alerts retrieved successfully", body = Vec<AlertResponse>),
        (status = 400, description = "limit out of range"),
    ),
    tag = "alerts"
)]
pub async fn recent_alerts(
    State(state): State<AppState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> AppResult<Json<Vec<AlertResponse>>> {
    let Query(query) = query?;
    let limit = resolve_limit(query.limit, RECENT_LIMIT_DEFAULT, RECENT_LIMIT_MAX)?;

    let alerts_list = alerts::Entity::find()
        .order_by_desc(alerts::Column::Timestamp)
        .order_by_desc(alerts::Column::Id)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(
        alerts_list.into_iter().map(AlertResponse::from).collect(),
    ))
}
