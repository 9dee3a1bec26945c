//! Posts synthetic sensor traffic to a running backend.

use tokio::signal;

use aeris::common::logging::init_tracing;
use aeris::config::FeederConfig;
use aeris::feeder::{BackendClient, scheduler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = FeederConfig::from_env()?;
    init_tracing(config.log_format, "info,aeris=debug,sample_feeder=debug");

    let client = BackendClient::new(&config)?;

    tokio::select! {
        () = scheduler::run_feeder(client, config) => {},
        result = signal::ctrl_c() => {
            result?;
            tracing::info!("Received Ctrl+C, stopping feeder");
        },
    }

    Ok(())
}
