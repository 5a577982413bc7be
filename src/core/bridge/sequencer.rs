use crate::domain::config::BridgeConfig;
use crate::domain::error::{BreakBridgeError, BreakBridgeResult, Phase};
use crate::infrastructure::serial::SerialLine;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

/// Size of the single post-break drain read
pub const DRAIN_READ_SIZE: usize = 1024;

/// Handshake progress for one accepted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakState {
    Idle,
    Delaying,
    Breaking,
    Draining,
    Done,
}

impl BreakState {
    pub fn next(self) -> Self {
        match self {
            BreakState::Idle => BreakState::Delaying,
            BreakState::Delaying => BreakState::Breaking,
            BreakState::Breaking => BreakState::Draining,
            BreakState::Draining | BreakState::Done => BreakState::Done,
        }
    }
}

impl std::fmt::Display for BreakState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakState::Idle => write!(f, "Idle"),
            BreakState::Delaying => write!(f, "Delaying"),
            BreakState::Breaking => write!(f, "Breaking"),
            BreakState::Draining => write!(f, "Draining"),
            BreakState::Done => write!(f, "Done"),
        }
    }
}

/// Delay, break, drain, forward. Consumed by `run`, so it fires once.
#[derive(Debug)]
pub struct BreakSequencer {
    break_delay: Duration,
    break_length: Duration,
    state: BreakState,
}

impl BreakSequencer {
    pub fn new(break_delay: Duration, break_length: Duration) -> Self {
        Self {
            break_delay,
            break_length,
            state: BreakState::Idle,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.break_delay(), config.break_length())
    }

    pub fn state(&self) -> BreakState {
        self.state
    }

    fn advance(&mut self) {
        let next = self.state().next();
        trace!("Break sequencer {} -> {}", self.state(), next);
        self.state = next;
    }

    /// Run the handshake and return the drained bytes, which have already
    /// been written to `conn`.
    pub async fn run<S, C>(mut self, serial: &mut S, conn: &mut C) -> BreakBridgeResult<Vec<u8>>
    where
        S: SerialLine + ?Sized,
        C: AsyncWrite + Unpin + ?Sized,
    {
        self.advance();
        debug!(
            "Starting initial delay of {}ms before break",
            self.break_delay.as_millis()
        );
        tokio::time::sleep(self.break_delay).await;

        self.advance();
        debug!("Sending break pulse of {}ms", self.break_length.as_millis());
        serial
            .send_break(self.break_length)
            .await
            .map_err(|e| BreakBridgeError::device(Phase::Handshake, e))?;

        self.advance();
        let drained = serial
            .read(DRAIN_READ_SIZE)
            .await
            .map_err(|e| BreakBridgeError::device(Phase::Handshake, e))?;
        debug!(
            "Received {} bytes during the break: {}",
            drained.len(),
            hex::encode(&drained)
        );

        self.advance();
        if !drained.is_empty() {
            conn.write_all(&drained)
                .await
                .map_err(|e| BreakBridgeError::bridge(Phase::Handshake, e))?;
            conn.flush()
                .await
                .map_err(|e| BreakBridgeError::bridge(Phase::Handshake, e))?;
        }

        Ok(drained)
    }
}
