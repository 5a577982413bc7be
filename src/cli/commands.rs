use crate::cli::args::Args;
use crate::core::runner;
use crate::domain::config::{BridgeConfig, PartialBridgeConfig};
use crate::domain::error::BreakBridgeResult;
use crate::infrastructure::{config::load_config_from_path, logging::init_logging};
use tracing::info;

/// Merge command line, config file and defaults
pub fn resolve_config(args: &Args) -> BreakBridgeResult<BridgeConfig> {
    let file = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => PartialBridgeConfig::default(),
    };

    args.overrides().or(file).resolve()
}

/// Execute the bridge described by `args`
pub async fn execute_command(args: Args) -> BreakBridgeResult<()> {
    if !args.quiet {
        init_logging(args.verbose)?;
    }

    let config = resolve_config(&args)?;

    info!(
        "Serial Port Forwarder with Break {} starting up",
        env!("CARGO_PKG_VERSION")
    );

    let summary = runner::run(&config).await?;
    info!(
        "Done: {} drained bytes, {} iterations",
        summary.drained.len(),
        summary.forwarded.iterations
    );
    Ok(())
}
