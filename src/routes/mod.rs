pub mod alerts;
pub mod dashboard;
pub mod data;
pub mod errors;
pub mod health;
pub mod healthz;
pub mod nodes;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::payload;
use crate::services::rate_limit::ClientIpKeyExtractor;

/// Default and maximum `limit` for the recent-alerts / recent-errors endpoints.
pub const RECENT_LIMIT_DEFAULT: u64 = 20;
pub const RECENT_LIMIT_MAX: u64 = 100;

/// Default and maximum `limit` for the history endpoint.
pub const HISTORY_LIMIT_DEFAULT: u64 = 200;
pub const HISTORY_LIMIT_MAX: u64 = 2000;

/// Acknowledgement returned by every ingestion endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    #[must_use]
    pub fn created() -> (StatusCode, Json<Self>) {
        (StatusCode::CREATED, Json(Self { ok: true }))
    }
}

/// Query parameters shared by the "recent" endpoints
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentQuery {
    /// Number of rows to return, newest first (1-100, default 20)
    pub limit: Option<i64>,
}

/// Resolve a caller-supplied `limit` against an endpoint's bounds.
///
/// # Errors
///
/// Returns `AppError::BadRequest` when the value lies outside `[1, max]`.
pub fn resolve_limit(requested: Option<i64>, default: u64, max: u64) -> AppResult<u64> {
    match requested {
        None => Ok(default),
        Some(n) => u64::try_from(n)
            .ok()
            .filter(|n| (1..=max).contains(n))
            .ok_or_else(|| AppError::BadRequest(format!("limit must be between 1 and {max}"))),
    }
}

/// Reject blank node identifiers before anything is written.
pub(crate) fn require_node_id(node_id: &str) -> AppResult<()> {
    if node_id.trim().is_empty() {
        return Err(AppError::InvalidPayload(
            "node_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz::healthz,
        data::ingest_data,
        data::get_history,
        alerts::ingest_alert,
        alerts::recent_alerts,
        errors::ingest_error,
        errors::recent_errors,
        health::ingest_health,
        health::latest_health,
        nodes::overview,
    ),
    components(
        schemas(
            Ack,
            payload::SensorDataCreate,
            payload::Readings,
            payload::SensorReading,
            payload::ReadingStatus,
            payload::AlertCreate,
            payload::ErrorCreate,
            payload::HealthReportCreate,
            data::HistoryRow,
            alerts::AlertResponse,
            errors::ErrorLogResponse,
            health::LatestHealthResponse,
            nodes::NodeOverview,
        )
    ),
    tags(
        (name = "health", description = "Liveness probe and network health reports"),
        (name = "data", description = "Sensor readings"),
        (name = "alerts", description = "Node alerts"),
        (name = "errors", description = "Node error logs"),
        (name = "nodes", description = "Per-node latest state"),
    ),
    info(
        title = "AERIS API",
        description = "Telemetry ingestion and query API for mold-risk sensor nodes",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            ingest_rate = %format!("{}/s burst {}", config.rate_limit_ingest_per_second, config.rate_limit_ingest_burst),
            query_rate = %format!("{}/s burst {}", config.rate_limit_query_per_second, config.rate_limit_query_burst),
            "Rate limiting configured"
        );
    }

    let ingest_routes_base = Router::new()
        .route("/data/", post(data::ingest_data))
        .route("/alerts/", post(alerts::ingest_alert))
        .route("/errors/", post(errors::ingest_error))
        .route("/health/", post(health::ingest_health));

    let query_routes_base = Router::new()
        .route("/data/history", get(data::get_history))
        .route("/alerts/recent", get(alerts::recent_alerts))
        .route("/errors/recent", get(errors::recent_errors))
        .route("/health/latest", get(health::latest_health))
        .route("/nodes/overview", get(nodes::overview));

    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(ingest_routes_base)
            .merge(query_routes_base)
    } else {
        let ingest_limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_second(config.rate_limit_ingest_per_second.max(1))
            .burst_size(config.rate_limit_ingest_burst.max(1))
            .finish()
            .expect("per_second and burst_size are non-zero");

        let query_limiter = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_second(config.rate_limit_query_per_second.max(1))
            .burst_size(config.rate_limit_query_burst.max(1))
            .finish()
            .expect("per_second and burst_size are non-zero");

        Router::new()
            .merge(ingest_routes_base.layer(GovernorLayer {
                config: Arc::new(ingest_limiter),
            }))
            .merge(query_routes_base.layer(GovernorLayer {
                config: Arc::new(query_limiter),
            }))
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Probe and dashboard (NO rate limiting)
    let page_routes = Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/healthz", get(healthz::healthz));

    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(docs_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
