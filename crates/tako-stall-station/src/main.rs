/*
[INPUT]:  Optional YAML config path (TAKO_STALL_CONFIG), OS shutdown signals
[OUTPUT]: Running station event loop with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing startup flow or shutdown handling
*/

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use tako_stall_station::{Station, StationConfig, init_tracing};

const CONFIG_ENV: &str = "TAKO_STALL_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    init_tracing(&config.log_level)?;

    info!(
        removal = ?config.engine.queue.removal,
        first_queue_number = config.engine.queue.first_queue_number,
        "starting tako-stall-station"
    );

    let mut station = Station::new(&config).context("build station")?;
    setup_signal_handlers(station.shutdown_token());

    station.run().await.context("station loop")?;
    info!("shutdown complete");
    Ok(())
}

fn load_config() -> Result<StationConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => StationConfig::from_file(&path).context("load config"),
        Err(_) => Ok(StationConfig::default()),
    }
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown.cancel();
    });
}
