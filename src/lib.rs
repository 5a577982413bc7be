//! BreakBridge Library
//!
//! Bridges a single TCP client to a serial line, sending a UART break
//! when the client connects and then relaying bytes in both directions.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::bridge::{
    BreakSequencer, BreakState, Bridge, BridgeSummary, ForwardStats, ForwardingLoop,
};
pub use crate::domain::config::{BridgeConfig, PartialBridgeConfig};
pub use crate::domain::error::{BreakBridgeError, BreakBridgeResult, Phase};
pub use crate::infrastructure::serial::{SerialLine, SerialTransport};
pub use crate::infrastructure::tcp::ConnectionAcceptor;
