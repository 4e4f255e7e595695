//! Logging configuration
//!
//! Diagnostics go to stderr so stdout stays clean NDJSON.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging(debug: bool) -> Result<()> {
    let log_level = if debug { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("session_enum={}", log_level)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(debug)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
