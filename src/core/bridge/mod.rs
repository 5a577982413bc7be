//! Break-then-forward bridge for one client connection.
//!
//! A bridge runs the [`BreakSequencer`] once and then hands the connection to
//! the [`ForwardingLoop`] until the client closes it. The connection is owned
//! by the bridge and is shut down on every exit path.

pub mod forwarder;
pub mod sequencer;

#[cfg(test)]
pub(crate) mod mock;

pub use forwarder::{ForwardStats, ForwardingLoop, CHUNK_SIZE};
pub use sequencer::{BreakSequencer, BreakState, DRAIN_READ_SIZE};

use crate::domain::config::BridgeConfig;
use crate::domain::error::BreakBridgeResult;
use crate::infrastructure::serial::SerialLine;
use std::fmt::Display;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// What a completed bridge moved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeSummary {
    /// Bytes from the post-break drain read
    pub drained: Vec<u8>,
    pub forwarded: ForwardStats,
}

/// Services a single connection against a serial line
pub struct Bridge<'a, S: SerialLine + ?Sized> {
    serial: &'a mut S,
    sequencer: BreakSequencer,
}

impl<'a, S: SerialLine + ?Sized> Bridge<'a, S> {
    pub fn new(serial: &'a mut S, config: &BridgeConfig) -> Self {
        Self {
            serial,
            sequencer: BreakSequencer::from_config(config),
        }
    }

    pub fn with_sequencer(serial: &'a mut S, sequencer: BreakSequencer) -> Self {
        Self { serial, sequencer }
    }

    /// Run handshake and forwarding on `conn`, then close it
    pub async fn serve<C, P>(self, mut conn: C, peer: P) -> BreakBridgeResult<BridgeSummary>
    where
        C: AsyncRead + AsyncWrite + Unpin,
        P: Display,
    {
        let Bridge { serial, sequencer } = self;
        let mut forwarding = ForwardingLoop::new();

        let result = run_phases(serial, sequencer, &mut forwarding, &mut conn).await;

        let stats = forwarding.stats();
        info!(
            "Closing connection from {} ({} bytes to serial, {} bytes to client)",
            peer, stats.bytes_to_serial, stats.bytes_to_client
        );
        if let Err(e) = conn.shutdown().await {
            debug!("Shutdown of connection from {} failed: {}", peer, e);
        }
        drop(conn);

        result
    }
}

async fn run_phases<S, C>(
    serial: &mut S,
    sequencer: BreakSequencer,
    forwarding: &mut ForwardingLoop,
    conn: &mut C,
) -> BreakBridgeResult<BridgeSummary>
where
    S: SerialLine + ?Sized,
    C: AsyncRead + AsyncWrite + Unpin,
{
    let drained = sequencer.run(serial, conn).await?;
    let forwarded = forwarding.run(serial, conn).await?;
    Ok(BridgeSummary { drained, forwarded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{BreakBridgeError, Phase};
    use super::mock::MockSerial;
    use std::time::Duration;
    use tokio::io::{duplex, AsyncReadExt};

    fn quick_config() -> BridgeConfig {
        let mut config = BridgeConfig::new(5000, "/dev/ttyUSB0");
        config.break_delay_ms = 0;
        config.break_length_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_drain_reaches_client_before_any_forwarding() {
        let mut serial = MockSerial::new().reply(b"READY\r\n").reply(b"PONG");
        let (mut client, server) = duplex(4096);

        client.write_all(b"PING").await.unwrap();
        client.shutdown().await.unwrap();

        let summary = Bridge::new(&mut serial, &quick_config())
            .serve(server, "test-peer")
            .await
            .unwrap();

        let mut received = Vec::new();
        client.read_to_end(&mut received).await.unwrap();

        assert_eq!(received, b"READY\r\nPONG");
        assert_eq!(summary.drained, b"READY\r\n");
        assert_eq!(summary.forwarded.bytes_to_serial, 4);
        assert_eq!(serial.kinds(), vec!["break", "read", "write", "read"]);
    }

    #[tokio::test]
    async fn test_connection_closed_after_error() {
        let mut serial = MockSerial::new().fail_write();
        let (mut client, server) = duplex(4096);

        client.write_all(b"PING").await.unwrap();

        let err = Bridge::new(&mut serial, &quick_config())
            .serve(server, "test-peer")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BreakBridgeError::Device {
                phase: Phase::Forwarding,
                ..
            }
        ));

        let mut received = Vec::new();
        let n = client.read_to_end(&mut received).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_zero_timings_pass_straight_through() {
        let mut serial = MockSerial::new();
        let (mut client, server) = duplex(64);
        client.shutdown().await.unwrap();

        let sequencer = BreakSequencer::new(Duration::ZERO, Duration::ZERO);
        let summary = Bridge::with_sequencer(&mut serial, sequencer)
            .serve(server, "test-peer")
            .await
            .unwrap();

        assert_eq!(summary, BridgeSummary::default());
        assert_eq!(serial.kinds(), vec!["break", "read"]);
    }
}
