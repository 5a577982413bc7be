// Core module - Break handshake and forwarding
pub mod bridge;
pub mod runner;

pub use bridge::{Bridge, BridgeSummary};
pub use runner::run;
