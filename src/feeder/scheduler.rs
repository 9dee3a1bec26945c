use chrono::Utc;
use futures::future::join_all;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::config::FeederConfig;
use crate::feeder::{BackendClient, synth};

/// Outcome of one feeder cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub sent: usize,
    pub failed: usize,
}

impl CycleReport {
    fn record<E: std::fmt::Display>(&mut self, what: &str, result: Result<(), E>) {
        match result {
            Ok(()) => self.sent += 1,
            Err(e) => {
                self.failed += 1;
                tracing::warn!(error = %e, kind = what, "Feeder send failed");
            }
        }
    }
}

/// Post one round of fabricated traffic: a reading per node, a health report,
/// then an alert and an error when their dice roll in.
pub async fn run_cycle<R: Rng + ?Sized>(
    client: &BackendClient,
    config: &FeederConfig,
    rng: &mut R,
) -> CycleReport {
    let now = Utc::now();
    let readings: Vec<_> = config
        .nodes
        .iter()
        .map(|node_id| synth::sensor_reading(rng, node_id, now))
        .collect();
    let health = synth::health_report(&config.nodes);
    let alert = synth::maybe_alert(rng, config.alert_probability);
    let error = synth::maybe_error(rng, config.error_probability);

    let mut report = CycleReport::default();

    for result in join_all(readings.iter().map(|r| client.send_data(r))).await {
        report.record("data", result);
    }
    report.record("health", client.send_health(&health).await);
    if let Some(alert) = &alert {
        report.record("alert", client.send_alert(alert).await);
    }
    if let Some(error) = &error {
        report.record("error", client.send_error(error).await);
    }

    report
}

/// Fixed-rate ticker. A cycle that overruns delays the next tick instead of
/// triggering a burst of catch-up cycles.
#[must_use]
pub fn cycle_ticker(interval_seconds: u64) -> Interval {
    let mut ticker = interval(Duration::from_secs(interval_seconds.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Run the feeder until the task is dropped.
pub async fn run_feeder(client: BackendClient, config: FeederConfig) {
    tracing::info!(
        backend = client.base_url(),
        interval_secs = config.interval_seconds,
        nodes = ?config.nodes,
        "Starting sample feeder"
    );

    let mut rng = StdRng::from_entropy();
    let mut ticker = cycle_ticker(config.interval_seconds);

    loop {
        ticker.tick().await;
        let report = run_cycle(&client, &config, &mut rng).await;
        tracing::debug!(sent = report.sent, failed = report.failed, "Feeder cycle done");
    }
}
