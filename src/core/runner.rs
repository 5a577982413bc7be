use crate::core::bridge::{Bridge, BridgeSummary};
use crate::domain::config::BridgeConfig;
use crate::domain::error::BreakBridgeResult;
use crate::infrastructure::serial::SerialTransport;
use crate::infrastructure::tcp::ConnectionAcceptor;
use tracing::{debug, info};

/// Open the serial line, wait for one client and bridge it until it leaves
pub async fn run(config: &BridgeConfig) -> BreakBridgeResult<BridgeSummary> {
    config.validate()?;

    let mut serial = SerialTransport::open(&config.device, config.baud_rate)?;
    let acceptor = ConnectionAcceptor::listen(&config.host, config.port).await?;
    info!(
        "Bridging {} ({} baud, 8-N-1) to the first client on {}",
        serial.path(),
        serial.baud_rate(),
        config.listen_addr()
    );
    let (conn, peer) = acceptor.accept_once().await?;

    if let Err(e) = conn.set_nodelay(true) {
        debug!("Could not set TCP_NODELAY for {}: {}", peer, e);
    }

    let summary = Bridge::new(&mut serial, config).serve(conn, peer).await?;
    info!("Bridge for {} finished", serial.path());
    Ok(summary)
}
