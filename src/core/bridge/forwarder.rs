use crate::domain::error::{BreakBridgeError, BreakBridgeResult, Phase};
use crate::infrastructure::serial::SerialLine;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

/// Largest chunk moved in either direction per iteration
pub const CHUNK_SIZE: usize = 1024;

/// Transfer totals for one forwarding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardStats {
    pub iterations: u64,
    pub bytes_to_serial: u64,
    pub bytes_to_client: u64,
}

/// Client-driven copy loop between a connection and a serial line.
///
/// Each iteration blocks on the client, writes what arrived to the serial
/// line, then makes one bounded serial read and relays any reply. The serial
/// line is only polled after client data, and a client EOF is the only
/// normal way out.
#[derive(Debug, Default)]
pub struct ForwardingLoop {
    stats: ForwardStats,
}

impl ForwardingLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ForwardStats {
        self.stats
    }

    pub async fn run<S, C>(&mut self, serial: &mut S, conn: &mut C) -> BreakBridgeResult<ForwardStats>
    where
        S: SerialLine + ?Sized,
        C: AsyncRead + AsyncWrite + Unpin + ?Sized,
    {
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            let n = conn
                .read(&mut buffer)
                .await
                .map_err(|e| BreakBridgeError::bridge(Phase::Forwarding, e))?;
            if n == 0 {
                debug!("Client closed the connection");
                break;
            }

            self.stats.iterations += 1;
            let request = &buffer[..n];
            debug!("-> {}", hex::encode(request));

            serial
                .write(request)
                .await
                .map_err(|e| BreakBridgeError::device(Phase::Forwarding, e))?;
            self.stats.bytes_to_serial += n as u64;

            let reply = serial
                .read(CHUNK_SIZE)
                .await
                .map_err(|e| BreakBridgeError::device(Phase::Forwarding, e))?;
            if reply.is_empty() {
                trace!("No serial reply this iteration");
                continue;
            }

            debug!("<- {}", hex::encode(&reply));
            conn.write_all(&reply)
                .await
                .map_err(|e| BreakBridgeError::bridge(Phase::Forwarding, e))?;
            conn.flush()
                .await
                .map_err(|e| BreakBridgeError::bridge(Phase::Forwarding, e))?;
            self.stats.bytes_to_client += reply.len() as u64;
        }

        Ok(self.stats)
    }
}
