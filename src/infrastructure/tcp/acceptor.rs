use crate::domain::config::format_listen_addr;
use crate::domain::error::{BreakBridgeError, BreakBridgeResult, Phase};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

/// Listening socket that hands out exactly one connection
pub struct ConnectionAcceptor {
    listener: TcpListener,
    bind_addr: SocketAddr,
}

impl ConnectionAcceptor {
    pub async fn listen(host: &str, port: u16) -> BreakBridgeResult<Self> {
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|source| BreakBridgeError::Bind {
                addr: format_listen_addr(host, port),
                source,
            })?;

        let bind_addr = listener.local_addr().map_err(|source| BreakBridgeError::Bind {
            addr: format_listen_addr(host, port),
            source,
        })?;

        info!("Starting to listen on {}", bind_addr);

        Ok(Self { listener, bind_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Wait for the single client. The listener is closed once it returns,
    /// so later connection attempts are refused.
    pub async fn accept_once(self) -> BreakBridgeResult<(TcpStream, SocketAddr)> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(|e| BreakBridgeError::bridge(Phase::Accept, e))?;

        info!("Connected by {}", addr);
        Ok((stream, addr))
    }
}
