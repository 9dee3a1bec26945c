use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{
        StatusCode,
        header::{self, HeaderMap, HeaderValue},
    },
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

use crate::common::AppState;
use crate::entity::sensor_data;
use crate::error::{AppError, AppResult};
use crate::payload::SensorDataCreate;
use crate::routes::{Ack, HISTORY_LIMIT_DEFAULT, HISTORY_LIMIT_MAX, require_node_id, resolve_limit};
use crate::services::nodes::{NodeUpdate, upsert_node};

use super::types::{HistoryQuery, HistoryRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryFormat {
    Json,
    Csv,
}

fn determine_format(query_format: &str, headers: &HeaderMap) -> AppResult<HistoryFormat> {
    // Query parameter takes precedence
    match query_format.to_lowercase().as_str() {
        "csv" => return Ok(HistoryFormat::Csv),
        "json" => {}
        other => {
            return Err(AppError::BadRequest(format!(
                "unsupported format '{other}' (expected json or csv)"
            )));
        }
    }

    if let Some(accept) = headers.get(header::ACCEPT)
        && let Ok(accept_str) = accept.to_str()
        && accept_str.contains("text/csv")
    {
        return Ok(HistoryFormat::Csv);
    }

    Ok(HistoryFormat::Json)
}

fn build_csv_response(rows: &[HistoryRow]) -> AppResult<Response> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // serialize() only emits the header alongside the first record
    if rows.is_empty() {
        writer
            .write_record(HistoryRow::CSV_HEADER)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .body(axum::body::Body::from(body))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Ingest one sensor reading
///
/// Stores the reading and marks the node ONLINE with `last_seen` set to the
/// reading's timestamp. Both writes commit together.
#[utoipa::path(
    post,
    path = "/api/data/",
    request_body = SensorDataCreate,
    responses(
        (status = 201, description = "Reading stored", body = Ack),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "Missing or mistyped fields"),
    ),
    tag = "data"
)]
pub async fn ingest_data(
    State(state): State<AppState>,
    payload: Result<Json<SensorDataCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Ack>)> {
    let Json(payload) = payload?;
    require_node_id(&payload.node_id)?;

    let readings = &payload.readings;
    let status = &payload.status;

    let txn = state.db.begin().await?;

    upsert_node(&txn, &payload.node_id, NodeUpdate::reading(payload.timestamp)).await?;

    let row = sensor_data::ActiveModel {
        node_id: Set(payload.node_id.clone()),
        timestamp: Set(payload.timestamp),
        temp_1: Set(readings.sensor_1.temp),
        hum_1: Set(readings.sensor_1.hum),
        temp_2: Set(readings.sensor_2.temp),
        hum_2: Set(readings.sensor_2.hum),
        mold_index: Set(readings.mold_index),
        drift_val: Set(readings.drift_val),
        system_health: Set(status.system_health.clone()),
        risk_level: Set(status.risk_level),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::debug!(
        id = row.id,
        node_id = %row.node_id,
        timestamp = %row.timestamp,
        "sensor_data_ingested"
    );

    Ok(Ack::created())
}

/// Get reading history for one node
///
/// Returns the most recent `limit` readings in chronological order (oldest
/// first). Supports JSON and CSV.
#[utoipa::path(
    get,
    path = "/api/data/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History retrieved successfully", body = Vec<HistoryRow>),
        (status = 400, description = "Missing node_id, limit out of range or unknown format"),
    ),
    tag = "data"
)]
pub async fn get_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let Query(query) = query?;
    let limit = resolve_limit(query.limit, HISTORY_LIMIT_DEFAULT, HISTORY_LIMIT_MAX)?;
    let format = determine_format(&query.format, &headers)?;

    // Newest first so LIMIT keeps the latest rows, then flip to chronological
    let mut rows = sensor_data::Entity::find()
        .filter(sensor_data::Column::NodeId.eq(query.node_id.as_str()))
        .order_by_desc(sensor_data::Column::Timestamp)
        .order_by_desc(sensor_data::Column::Id)
        .limit(limit)
        .all(&state.db)
        .await?;
    rows.reverse();

    let history: Vec<HistoryRow> = rows.into_iter().map(HistoryRow::from).collect();

    match format {
        HistoryFormat::Csv => build_csv_response(&history),
        HistoryFormat::Json => Ok(Json(history).into_response()),
    }
}
