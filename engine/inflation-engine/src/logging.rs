//! Logging and tracing setup

use crate::config::LoggingConfig;
use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Build the level filter; `RUST_LOG` takes precedence over the configured level
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&config.level)?),
    }
}

/// Initialize logging and tracing
pub fn initialize_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_filter(config)?;

    // Logs go to stderr so command output on stdout stays machine-readable
    let fmt_layer = match config.format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        "pretty" => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(true)
            .boxed(),
        _ => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
            .boxed(),
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    Ok(())
}
