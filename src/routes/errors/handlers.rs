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
use crate::entity::error_logs;
use crate::error::AppResult;
use crate::payload::ErrorCreate;
use crate::routes::{
    Ack, RECENT_LIMIT_DEFAULT, RECENT_LIMIT_MAX, RecentQuery, require_node_id, resolve_limit,
};
use crate::services::nodes::{NodeUpdate, upsert_node};

use super::types::ErrorLogResponse;

/// Ingest an error reported by a node
#[utoipa::path(
    post,
    path = "/api/errors/",
    request_body = ErrorCreate,
    responses(
        (status = 201, description = "Error stored", body = Ack),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Missing or mistyped fields"),
    ),
    tag = "errors"
)]
pub async fn ingest_error(
    State(state): State<AppState>,
    payload: Result<Json<ErrorCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Ack>)> {
    let Json(payload) = payload?;
    require_node_id(&payload.node_id)?;

    let now = Utc::now();
    let txn = state.db.begin().await?;

    upsert_node(&txn, &payload.node_id, NodeUpdate::seen(now)).await?;

    let row = error_logs::ActiveModel {
        node_id: Set(payload.node_id),
        timestamp: Set(now),
        error_code: Set(payload.error_code),
        details: Set(serde_json::Value::Object(payload.details)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::debug!(
        id = row.id,
        node_id = %row.node_id,
        error_code = %row.error_code,
        "error_log_ingested"
    );

    Ok(Ack::created())
}

/// List the most recent node errors, newest first
#[utoipa::path(
    get,
    path = "/api/errors/recent",
    params(RecentQuery),
    responses(
        (status = 200, description = "Errors retrieved successfully", body = Vec<ErrorLogResponse>),
        (status = 400, description = "limit out of range"),
    ),
    tag = "errors"
)]
pub async fn recent_errors(
    State(state): State<AppState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> AppResult<Json<Vec<ErrorLogResponse>>> {
    let Query(query) = query?;
    let limit = resolve_limit(query.limit, RECENT_LIMIT_DEFAULT, RECENT_LIMIT_MAX)?;

    let errors_list = error_logs::Entity::find()
        .order_by_desc(error_logs::Column::Timestamp)
        .order_by_desc(error_logs::Column::Id)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(
        errors_list.into_iter().map(ErrorLogResponse::from).collect(),
    ))
}
