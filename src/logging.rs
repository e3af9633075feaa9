//! Logging setup
//!
//! The log level can be controlled via the `RUST_LOG` environment variable.
//!
//! Default log levels:
//! - `streamo` modules: INFO
//! - `tower_http`: DEBUG (request traces)
//! - Other crates: WARN

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "streamo=info,tower_http=debug,warn";

/// Initialize the logging system.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("streamo=debug,tower_http=debug,warn")
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}
