/*
[INPUT]:  Log level directive from configuration
[OUTPUT]: Global tracing subscriber
[POS]:    Observability layer - structured logging setup
[UPDATE]: When log output format or filtering changes
*/

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Fails if one is already installed.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_directive() {
        assert!(init_tracing("tako_stall_engine=loud").is_err());
    }
}
