//! Tracing configuration for the light client.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LogConfig;

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr so that stdout only carries command output.
/// # Errors
/// Returns an error if a global subscriber is already set
pub fn init_subscriber(config: &LogConfig) -> Result<()> {
    let subscriber = Registry::default()
        .with(EnvFilter::new(config.level().as_str().to_lowercase()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(true),
        );

    subscriber
        .try_init()
        .context("Failed to set global default subscriber")
}
