//! End-to-end tests for the HTTP API against an in-memory SQLite store.
//!
//! Run with: cargo test --test api_test

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait, QueryFilter, Statement,
};
use serde_json::{Value, json};

use aeris::config::Config;
use aeris::entity::{alerts, error_logs, health_reports, nodes, sensor_data};
use aeris::services::nodes::{NodeUpdate, upsert_node};
use common::{body_bytes, file_db, reading, test_app, test_app_on, test_app_with};

async fn node(db: &sea_orm::DatabaseConnection, node_id: &str) -> Option<nodes::Model> {
    nodes::Entity::find()
        .filter(nodes::Column::NodeId.eq(node_id))
        .one(db)
        .await
        .expect("query nodes")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app().await;
    let (status, _) = app.get_json("/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn ingested_reading_comes_back_in_history() {
    let app = test_app().await;

    let payload = json!({
        "node_id": "bathroom",
        "timestamp": "2024-01-01T00:00:00Z",
        "readings": {
            "sensor_1": {"temp": 23.0, "hum": 85.0},
            "sensor_2": {"temp": 23.2, "hum": 84.0},
            "mold_index": 2.5,
            "drift_val": 1.0
        },
        "status": {"system_health": "OK", "risk_level": 2}
    });
    let (status, body) = app.post_json("/api/data/", &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"ok": true}));

    let (status, body) = app.get_json("/api/data/history?node_id=bathroom").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["node_id"], "bathroom");
    assert_eq!(rows[0]["temp_1"], 23.0);
    assert_eq!(rows[0]["hum_1"], 85.0);
    assert_eq!(rows[0]["temp_2"], 23.2);
    assert_eq!(rows[0]["hum_2"], 84.0);
    assert_eq!(rows[0]["mold_index"], 2.5);
    assert_eq!(rows[0]["drift_val"], 1.0);
    assert_eq!(rows[0]["system_health"], "OK");
    assert_eq!(rows[0]["risk_level"], 2);

    let stored = node(&app.db, "bathroom").await.expect("node created");
    assert_eq!(stored.status, "ONLINE");
    assert_eq!(stored.drift_status, "SYNCED");
    assert_eq!(stored.last_seen.to_rfc3339(), "2024-01-01T00:00:00+00:00");
}

#[tokio::test]
async fn history_keeps_latest_rows_in_chronological_order() {
    let app = test_app().await;

    // Ingest out of order to make sure ordering comes from the timestamp
    for (ts, hum) in [
        ("2024-01-01T00:02:00Z", 52.0),
        ("2024-01-01T00:00:00Z", 50.0),
        ("2024-01-01T00:03:00Z", 53.0),
        ("2024-01-01T00:01:00Z", 51.0),
    ] {
        let (status, _) = app
            .post_json("/api/data/", &reading("living_room", ts, hum))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app.post_json(
        "/api/data/",
        &reading("bathroom", "2024-01-01T00:05:00Z", 70.0),
    )
    .await;

    let (_, body) = app
        .get_json("/api/data/history?node_id=living_room&limit=2")
        .await;
    let hums: Vec<f64> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["hum_1"].as_f64().expect("hum_1"))
        .collect();
    assert_eq!(hums, vec![52.0, 53.0]);

    let (_, body) = app.get_json("/api/data/history?node_id=living_room").await;
    assert_eq!(body.as_array().expect("array").len(), 4);

    let (_, body) = app.get_json("/api/data/history?node_id=unknown").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn history_exports_csv() {
    let app = test_app().await;
    app.post_json(
        "/api/data/",
        &reading("living_room", "2024-01-01T00:00:00Z", 55.0),
    )
    .await;

    let response = app
        .request(
            Request::builder()
                .uri("/api/data/history?node_id=living_room&format=csv")
                .body(Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("type"),
        "text/csv"
    );
    let text = String::from_utf8(body_bytes(response).await).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp,node_id,temp_1,hum_1,temp_2,hum_2,mold_index,drift_val,system_health,risk_level")
    );
    let row = lines.next().expect("data row");
    assert!(row.contains("living_room"));
    assert!(row.contains("55.0"));
    assert_eq!(lines.next(), None);

    // No rows still yields the header line
    let response = app
        .request(
            Request::builder()
                .uri("/api/data/history?node_id=nobody&format=csv")
                .body(Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(body_bytes(response).await).expect("utf8");
    assert_eq!(
        text.trim_end(),
        "timestamp,node_id,temp_1,hum_1,temp_2,hum_2,mold_index,drift_val,system_health,risk_level"
    );

    // Accept header selects CSV when no format is given
    let response = app
        .request(
            Request::builder()
                .uri("/api/data/history?node_id=living_room")
                .header(header::ACCEPT, "text/csv")
                .body(Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("type"),
        "text/csv"
    );

    let (status, _) = app
        .get_json("/api/data/history?node_id=living_room&format=xml")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn history_rejects_bad_query() {
    let app = test_app().await;

    let (status, body) = app.get_json("/api/data/history").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    for limit in ["0", "-1", "2001", "abc"] {
        let (status, _) = app
            .get_json(&format!("/api/data/history?node_id=x&limit={limit}"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "limit={limit}");
    }

    let (status, _) = app.get_json("/api/data/history?node_id=x&limit=2000").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn repeated_ingest_keeps_one_node_row() {
    let app = test_app().await;

    app.post_json(
        "/api/data/",
        &reading("living_room", "2024-01-01T00:00:00Z", 50.0),
    )
    .await;
    app.post_json(
        "/api/alerts/",
        &json!({"node_id": "living_room", "alert_level": "WARN", "message": "m", "metrics": {}}),
    )
    .await;
    app.post_json(
        "/api/errors/",
        &json!({"node_id": "living_room", "error_code": "E1", "details": {}}),
    )
    .await;
    app.post_json(
        "/api/data/",
        &reading("living_room", "2024-01-01T00:10:00Z", 51.0),
    )
    .await;

    let count = nodes::Entity::find()
        .filter(nodes::Column::NodeId.eq("living_room"))
        .count(&app.db)
        .await
        .expect("count");
    assert_eq!(count, 1);

    let stored = node(&app.db, "living_room").await.expect("node");
    assert_eq!(stored.last_seen.to_rfc3339(), "2024-01-01T00:10:00+00:00");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_sightings_create_one_node() {
    // Several pooled connections so the requests really overlap
    let (db, _file) = file_db(4).await;
    let app = test_app_on(
        db,
        Config {
            disable_rate_limiting: true,
            ..Config::default()
        },
    );

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            let payload = reading("kitchen", &format!("2024-01-01T00:00:0{i}Z"), 50.0);
            tokio::spawn(async move { app.post_json("/api/data/", &payload).await.0 })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.expect("join"), StatusCode::CREATED);
    }

    let count = nodes::Entity::find().count(&app.db).await.expect("count");
    assert_eq!(count, 1);
    let readings = sensor_data::Entity::find().count(&app.db).await.expect("count");
    assert_eq!(readings, 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_upserts_leave_one_row() {
    let (db, _file) = file_db(4).await;
    let seen = Utc::now();

    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                let update = if i % 2 == 0 {
                    NodeUpdate::seen(seen)
                } else {
                    NodeUpdate {
                        last_seen: None,
                        status: Some("DEGRADED"),
                        drift_status: Some("DRIFT_WARNING"),
                    }
                };
                upsert_node(&db, "garage", update).await
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("join").expect("upsert");
    }

    let rows = nodes::Entity::find().all(&db).await.expect("nodes");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].node_id, "garage");
    assert_eq!(rows[0].status, "DEGRADED");
    assert_eq!(rows[0].drift_status, "DRIFT_WARNING");
}

#[tokio::test]
async fn alert_creates_node_and_lists_newest_first() {
    let app = test_app().await;

    for i in 0..3 {
        let (status, body) = app
            .post_json(
                "/api/alerts/",
                &json!({
                    "node_id": "bathroom",
                    "alert_level": "CRITICAL",
                    "message": format!("alert {i}"),
                    "metrics": {"mold_index": 2.8, "humidity": 91.2}
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"ok": true}));
    }

    let stored = node(&app.db, "bathroom").await.expect("node created");
    assert_eq!(stored.status, "ONLINE");
    assert_eq!(stored.drift_status, "SYNCED");

    let (status, body) = app.get_json("/api/alerts/recent?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["message"], "alert 2");
    assert_eq!(rows[1]["message"], "alert 1");
    assert_eq!(rows[0]["metrics"], json!({"mold_index": 2.8, "humidity": 91.2}));
    assert!(rows[0]["id"].is_number());
    assert!(rows[0]["timestamp"].is_string());

    let (status, _) = app.get_json("/api/alerts/recent?limit=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn errors_are_stored_and_listed_newest_first() {
    let app = test_app().await;

    for i in 0..3 {
        let (status, _) = app
            .post_json(
                "/api/errors/",
                &json!({
                    "node_id": "master_bedroom",
                    "error_code": format!("ERR_{i}"),
                    "details": {"component": "Sensor 2 (DHT20)", "value_received": 0.0}
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get_json("/api/errors/recent").await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["error_code"].as_str().expect("error_code"))
        .collect();
    assert_eq!(codes, vec!["ERR_2", "ERR_1", "ERR_0"]);

    let (status, body) = app.get_json("/api/errors/recent?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["error_code"], "ERR_2");
    assert_eq!(rows[1]["error_code"], "ERR_1");
    assert_eq!(rows[0]["node_id"], "master_bedroom");
    assert_eq!(rows[0]["details"]["component"], "Sensor 2 (DHT20)");
    assert!(rows[0]["id"].is_number());
    assert!(rows[0]["timestamp"].is_string());

    for limit in ["0", "101"] {
        let (status, body) = app
            .get_json(&format!("/api/errors/recent?limit={limit}"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "limit={limit}");
        assert!(body["error"].is_string());
    }

    assert!(node(&app.db, "master_bedroom").await.is_some());
    assert_eq!(
        error_logs::Entity::find().count(&app.db).await.expect("count"),
        3
    );
}

#[tokio::test]
async fn long_text_fields_are_stored() {
    let app = test_app().await;
    let node_id = "n".repeat(300);
    let level = "CRITICAL_".repeat(20);

    let (status, _) = app
        .post_json(
            "/api/alerts/",
            &json!({"node_id": node_id, "alert_level": level, "message": "m", "metrics": {}}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get_json("/api/alerts/recent").await;
    assert_eq!(body[0]["alert_level"], level.as_str());
    assert_eq!(body[0]["node_id"], node_id.as_str());
}

#[tokio::test]
async fn schema_declares_no_string_length_caps() {
    let app = test_app().await;

    for table in ["nodes", "sensor_data", "alerts", "error_logs", "health_reports"] {
        let columns = app
            .db
            .query_all(Statement::from_string(
                DbBackend::Sqlite,
                format!("PRAGMA table_info({table})"),
            ))
            .await
            .expect("table_info");
        assert!(!columns.is_empty(), "{table} exists");

        for column in columns {
            let name: String = column.try_get("", "name").expect("name");
            let declared: String = column.try_get("", "type").expect("type");
            assert!(
                !declared.contains('('),
                "{table}.{name} is declared as {declared}"
            );
        }
    }
}

#[tokio::test]
async fn invalid_payloads_write_nothing() {
    let app = test_app().await;

    // Missing timestamp
    let (status, body) = app
        .post_json(
            "/api/data/",
            &json!({"node_id": "x", "readings": {}, "status": {}}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    // Unparseable timestamp
    let (status, _) = app
        .post_json("/api/data/", &reading("x", "yesterday", 50.0))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Wrong type for a metric
    let mut bad_type = reading("x", "2024-01-01T00:00:00Z", 50.0);
    bad_type["readings"]["sensor_1"]["temp"] = json!("hot");
    let (status, _) = app.post_json("/api/data/", &bad_type).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Blank node id
    let (status, _) = app
        .post_json("/api/data/", &reading("  ", "2024-01-01T00:00:00Z", 50.0))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Alert without message
    let (status, _) = app
        .post_json(
            "/api/alerts/",
            &json!({"node_id": "x", "alert_level": "WARN", "metrics": {}}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Malformed JSON
    let (status, body) = app.post_raw("/api/errors/", "{\"node_id\":".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(nodes::Entity::find().count(&app.db).await.expect("count"), 0);
    assert_eq!(
        sensor_data::Entity::find().count(&app.db).await.expect("count"),
        0
    );
    assert_eq!(alerts::Entity::find().count(&app.db).await.expect("count"), 0);
}

#[tokio::test]
async fn unknown_fields_and_missing_metrics_are_accepted() {
    let app = test_app().await;

    let payload = json!({
        "node_id": "attic",
        "timestamp": "2024-01-01T01:00:00+01:00",
        "firmware": "1.2.3",
        "readings": {"sensor_1": {"temp": 20.0}},
        "status": {}
    });
    let (status, _) = app.post_json("/api/data/", &payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get_json("/api/data/history?node_id=attic").await;
    let row = &body.as_array().expect("array")[0];
    assert_eq!(row["temp_1"], 20.0);
    assert_eq!(row["hum_1"], Value::Null);
    assert_eq!(row["temp_2"], Value::Null);
    assert_eq!(row["risk_level"], Value::Null);

    let stored = node(&app.db, "attic").await.expect("node");
    assert_eq!(stored.last_seen.to_rfc3339(), "2024-01-01T00:00:00+00:00");
}

#[tokio::test]
async fn health_latest_is_empty_then_verbatim() {
    let app = test_app().await;

    let (status, body) = app.get_json("/api/health/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let network = json!({"server_node": "ONLINE", "thread_mesh": "CONNECTED"});
    let nodes_map = json!({
        "living_room": {"status": "ONLINE", "sensors": "SYNCED"},
        "master_bedroom": {"status": "ONLINE", "sensors": "DRIFT_WARNING", "rssi": -71}
    });
    let (status, _) = app
        .post_json(
            "/api/health/",
            &json!({"network": {"server_node": "DEGRADED"}, "nodes": {}}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .post_json("/api/health/", &json!({"network": network, "nodes": nodes_map}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get_json("/api/health/latest").await;
    assert_eq!(body["network"], network);
    assert_eq!(body["nodes"], nodes_map);
    assert!(body["timestamp"].is_string());

    assert_eq!(
        health_reports::Entity::find()
            .count(&app.db)
            .await
            .expect("count"),
        2
    );
}

#[tokio::test]
async fn health_report_updates_node_status() {
    let app = test_app().await;

    app.post_json(
        "/api/data/",
        &reading("master_bedroom", "2024-01-01T00:00:00Z", 50.0),
    )
    .await;

    let (status, _) = app
        .post_json(
            "/api/health/",
            &json!({
                "network": {},
                "nodes": {
                    "master_bedroom": {"status": "DEGRADED", "sensors": "DRIFT_WARNING"},
                    "garage": {}
                }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let bedroom = node(&app.db, "master_bedroom").await.expect("node");
    assert_eq!(bedroom.status, "DEGRADED");
    assert_eq!(bedroom.drift_status, "DRIFT_WARNING");
    // Health reports do not move last_seen of known nodes
    assert_eq!(bedroom.last_seen.to_rfc3339(), "2024-01-01T00:00:00+00:00");

    let garage = node(&app.db, "garage").await.expect("node created");
    assert_eq!(garage.status, "ONLINE");
    assert_eq!(garage.drift_status, "SYNCED");

    // A later reading brings the node back ONLINE but leaves drift alone
    app.post_json(
        "/api/data/",
        &reading("master_bedroom", "2024-01-01T00:01:00Z", 50.0),
    )
    .await;
    let bedroom = node(&app.db, "master_bedroom").await.expect("node");
    assert_eq!(bedroom.status, "ONLINE");
    assert_eq!(bedroom.drift_status, "DRIFT_WARNING");
}

#[tokio::test]
async fn health_report_with_bad_node_entry_is_rejected() {
    let app = test_app().await;

    let (status, body) = app
        .post_json(
            "/api/health/",
            &json!({"network": {}, "nodes": {"living_room": {}, "bathroom": "ONLINE"}}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().expect("message").contains("bathroom"));

    let (status, _) = app
        .post_json("/api/health/", &json!({"network": {}}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(
        health_reports::Entity::find()
            .count(&app.db)
            .await
            .expect("count"),
        0
    );
    assert_eq!(nodes::Entity::find().count(&app.db).await.expect("count"), 0);
}

#[tokio::test]
async fn overview_lists_nodes_with_data_only() {
    let app = test_app().await;
    let now = Utc::now();

    app.post_json(
        "/api/alerts/",
        &json!({"node_id": "attic", "alert_level": "WARN", "message": "m", "metrics": {}}),
    )
    .await;
    let (_, body) = app.get_json("/api/nodes/overview").await;
    assert_eq!(body, json!([]));

    app.post_json(
        "/api/data/",
        &reading("living_room", &(now - Duration::minutes(2)).to_rfc3339(), 50.0),
    )
    .await;
    let mut latest = reading("living_room", &now.to_rfc3339(), 65.0);
    latest["readings"]["mold_index"] = json!(0.5);
    latest["status"]["risk_level"] = json!(0);
    app.post_json("/api/data/", &latest).await;
    app.post_json(
        "/api/data/",
        &reading("bathroom", &now.to_rfc3339(), 80.0),
    )
    .await;

    let (status, body) = app.get_json("/api/nodes/overview").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    let ids: Vec<&str> = rows
        .iter()
        .map(|r| r["node_id"].as_str().expect("node_id"))
        .collect();
    assert_eq!(ids, vec!["bathroom", "living_room"]);

    let living = &rows[1];
    assert_eq!(living["status"], "ONLINE");
    assert_eq!(living["drift_status"], "SYNCED");
    assert_eq!(living["hum_1"], 65.0);
    assert_eq!(living["mold_index"], 0.5);
    assert_eq!(living["risk_level"], 0);
}

#[tokio::test]
async fn overview_marks_stale_nodes_offline() {
    let app = test_app_with(Config {
        disable_rate_limiting: true,
        node_offline_after_minutes: 15,
        ..Config::default()
    })
    .await;
    let now = Utc::now();

    app.post_json(
        "/api/data/",
        &reading("cellar", &(now - Duration::minutes(16)).to_rfc3339(), 50.0),
    )
    .await;
    app.post_json(
        "/api/data/",
        &reading("kitchen", &(now - Duration::minutes(14)).to_rfc3339(), 50.0),
    )
    .await;

    let (_, body) = app.get_json("/api/nodes/overview").await;
    let rows = body.as_array().expect("array");
    assert_eq!(rows[0]["node_id"], "cellar");
    assert_eq!(rows[0]["status"], "OFFLINE");
    assert_eq!(rows[1]["node_id"], "kitchen");
    assert_eq!(rows[1]["status"], "ONLINE");

    // Only the reported status changes; the stored one is untouched
    let stored = node(&app.db, "cellar").await.expect("node");
    assert_eq!(stored.status, "ONLINE");
}

#[tokio::test]
async fn dashboard_and_docs_are_served() {
    let app = test_app().await;

    let response = app
        .request(Request::builder().uri("/").body(Body::empty()).expect("request"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).expect("utf8");
    assert!(html.contains("/api/nodes/overview"));

    let response = app
        .request(
            Request::builder()
                .uri("/docs")
                .body(Body::empty())
                .expect("request"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rate_limited_router_still_serves_requests() {
    let app = test_app_with(Config::default()).await;
    let (status, _) = app
        .post_json(
            "/api/data/",
            &reading("living_room", "2024-01-01T00:00:00Z", 50.0),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.get_json("/api/nodes/overview").await;
    assert_eq!(status, StatusCode::OK);
}
