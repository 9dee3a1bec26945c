//! Mold-risk scoring used by sensor nodes (and the sample feeder) before a
//! reading is sent. The backend stores whatever the node reports.

/// Humidity (%) at which the mold index starts rising above zero.
pub const MOLD_HUMIDITY_ONSET: f64 = 60.0;
/// Upper bound of the mold index.
pub const MOLD_INDEX_MAX: f64 = 3.0;

/// Linear mold index from relative humidity, clamped to `[0, 3]`.
#[must_use]
pub fn mold_index(humidity: f64) -> f64 {
    ((humidity - MOLD_HUMIDITY_ONSET) / 10.0).clamp(0.0, MOLD_INDEX_MAX)
}

/// Risk level bucket: 2 from index 2.0, 1 from index 1.0, otherwise 0.
#[must_use]
pub fn risk_level(mold_index: f64) -> i32 {
    if mold_index >= 2.0 {
        2
    } else if mold_index >= 1.0 {
        1
    } else {
        0
    }
}

/// Disagreement between a node's two sensors.
#[must_use]
pub fn drift(a: f64, b: f64) -> f64 {
    (a - b).abs()
}
