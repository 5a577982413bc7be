// Logging module - Logging infrastructure
use crate::domain::error::{BreakBridgeError, BreakBridgeResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "breakbridge=debug,warn"
    } else {
        "breakbridge=info,warn"
    }
}

/// Initialize logging system. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) -> BreakBridgeResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| BreakBridgeError::config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_init_once() {
        assert!(init_logging(false).is_ok());
        assert!(init_logging(true).is_err());
    }

    #[test]
    fn test_verbose_filter() {
        assert!(default_filter(true).contains("debug"));
        assert!(default_filter(false).contains("info"));
    }
}
