//! Shared fixtures: a migrated in-memory SQLite database and the full router.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use aeris::common::AppState;
use aeris::config::Config;
use aeris::routes;

#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

pub async fn test_db() -> DatabaseConnection {
    // One connection that never idles out, otherwise the in-memory database vanishes
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("connect sqlite");
    migration::Migrator::up(&db, None)
        .await
        .expect("run migrations");
    db
}

/// File-backed SQLite with a pool of `connections`, so concurrent requests run
/// on separate connections. The file is removed when the returned guard drops.
pub async fn file_db(connections: u32) -> (DatabaseConnection, TempDbFile) {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "aeris-test-{}-{}.sqlite",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ));
    let guard = TempDbFile(path.clone());

    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    options
        .max_connections(connections)
        .min_connections(connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("connect sqlite file");
    migration::Migrator::up(&db, None)
        .await
        .expect("run migrations");
    (db, guard)
}

pub struct TempDbFile(PathBuf);

impl Drop for TempDbFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut name = self.0.clone().into_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(name);
        }
    }
}

pub fn test_app_on(db: DatabaseConnection, config: Config) -> TestApp {
    let state = AppState::new(db.clone(), config);
    TestApp {
        router: routes::build_router(state),
        db,
    }
}

pub async fn test_app_with(config: Config) -> TestApp {
    let db = test_db().await;
    let state = AppState::new(db.clone(), config);
    TestApp {
        router: routes::build_router(state),
        db,
    }
}

pub async fn test_app() -> TestApp {
    test_app_with(Config {
        disable_rate_limiting: true,
        ..Config::default()
    })
    .await
}

impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("valid request");
        let response = self.request(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        let response = self.request(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// A complete reading for `node_id` at `timestamp` with humidity `hum_1`.
pub fn reading(node_id: &str, timestamp: &str, hum_1: f64) -> Value {
    serde_json::json!({
        "node_id": node_id,
        "timestamp": timestamp,
        "readings": {
            "sensor_1": {"temp": 22.0, "hum": hum_1},
            "sensor_2": {"temp": 22.1, "hum": hum_1 - 1.0},
            "mold_index": 0.0,
            "drift_val": 1.0
        },
        "status": {"system_health": "OK", "risk_level": 0}
    })
}
