//! Fabricated payloads. Every function takes the RNG explicitly so a seeded
//! generator reproduces a run.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::json;

use crate::mold;
use crate::payload::{
    AlertCreate, ErrorCreate, HealthReportCreate, JsonMap, ReadingStatus, Readings,
    SensorDataCreate, SensorReading,
};

/// Room that runs warmer and more humid than the others, and raises the alerts.
pub const HUMID_NODE: &str = "bathroom";
/// Room whose second sensor misbehaves: reports drift and raises the errors.
pub const FAULTY_NODE: &str = "master_bedroom";

pub const BASE_TEMP: f64 = 22.0;
pub const BASE_HUM: f64 = 50.0;

const TEMP_JITTER: f64 = 0.5;
const HUM_JITTER: f64 = 5.0;

/// Baseline (temperature °C, relative humidity %) for a room.
#[must_use]
pub fn baseline(node_id: &str) -> (f64, f64) {
    if node_id == HUMID_NODE {
        (BASE_TEMP + 0.5, BASE_HUM + 10.0)
    } else {
        (BASE_TEMP, BASE_HUM)
    }
}

/// One reading from both sensors of `node_id`, scored the way node firmware does.
pub fn sensor_reading<R: Rng + ?Sized>(
    rng: &mut R,
    node_id: &str,
    at: DateTime<Utc>,
) -> SensorDataCreate {
    let (base_temp, base_hum) = baseline(node_id);

    let temp_1 = base_temp + rng.gen_range(-TEMP_JITTER..=TEMP_JITTER);
    let temp_2 = base_temp + rng.gen_range(-TEMP_JITTER..=TEMP_JITTER);
    let hum_1 = base_hum + rng.gen_range(-HUM_JITTER..=HUM_JITTER);
    let hum_2 = base_hum + rng.gen_range(-HUM_JITTER..=HUM_JITTER);

    let mold_index = mold::mold_index(hum_1);

    SensorDataCreate {
        node_id: node_id.to_string(),
        timestamp: at,
        readings: Readings {
            sensor_1: SensorReading {
                temp: Some(temp_1),
                hum: Some(hum_1),
            },
            sensor_2: SensorReading {
                temp: Some(temp_2),
                hum: Some(hum_2),
            },
            mold_index: Some(mold_index),
            drift_val: Some(mold::drift(hum_1, hum_2)),
        },
        status: ReadingStatus {
            system_health: Some("OK".to_string()),
            risk_level: Some(mold::risk_level(mold_index)),
        },
    }
}

/// Health snapshot: every node online, [`FAULTY_NODE`] flagged with sensor drift.
#[must_use]
pub fn health_report(nodes: &[String]) -> HealthReportCreate {
    let network: JsonMap = [
        ("server_node".to_string(), json!("ONLINE")),
        ("thread_mesh".to_string(), json!("CONNECTED")),
    ]
    .into_iter()
    .collect();

    let nodes = nodes
        .iter()
        .map(|node_id| {
            let sensors = if node_id == FAULTY_NODE {
                "DRIFT_WARNING"
            } else {
                "SYNCED"
            };
            (
                node_id.clone(),
                json!({ "status": "ONLINE", "sensors": sensors }),
            )
        })
        .collect();

    HealthReportCreate { network, nodes }
}

/// A critical mold alert for [`HUMID_NODE`], with the given probability.
pub fn maybe_alert<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> Option<AlertCreate> {
    if !rng.gen_bool(probability) {
        return None;
    }

    let metrics: JsonMap = [
        (
            "mold_index".to_string(),
            json!(round_to(rng.gen_range(2.5..=3.0), 2)),
        ),
        (
            "humidity".to_string(),
            json!(round_to(rng.gen_range(80.0..=95.0), 1)),
        ),
    ]
    .into_iter()
    .collect();

    Some(AlertCreate {
        node_id: HUMID_NODE.to_string(),
        alert_level: "CRITICAL".to_string(),
        message: "Mold Growth Risk High. Ventilation Required Immediately.".to_string(),
        metrics,
    })
}

/// A sensor-disconnect error for [`FAULTY_NODE`], with the given probability.
pub fn maybe_error<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> Option<ErrorCreate> {
    if !rng.gen_bool(probability) {
        return None;
    }

    let details: JsonMap = [
        ("component".to_string(), json!("Sensor 2 (DHT20)")),
        ("value_received".to_string(), json!(0.0)),
        ("message".to_string(), json!("I2C Bus Timeout - Check wiring.")),
    ]
    .into_iter()
    .collect();

    Some(ErrorCreate {
        node_id: FAULTY_NODE.to_string(),
        error_code: "ERR_SENSOR_DISCONNECT".to_string(),
        details,
    })
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
