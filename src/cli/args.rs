use crate::domain::config::PartialBridgeConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for BreakBridge
#[derive(Parser, Debug)]
#[command(
    name = "breakbridge",
    version = env!("CARGO_PKG_VERSION"),
    about = "Serial port forwarder that sends a UART break when a client connects",
    long_about = "Accepts a single TCP client, holds the serial line in a break condition after a short delay, relays whatever the device emits, then forwards bytes between the client and the serial line until the client disconnects."
)]
pub struct Args {
    /// IP address to listen for connections on [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port to listen for the incoming connection on, e.g. 5000
    #[arg(long)]
    pub port: Option<u16>,

    /// Serial device to forward, e.g. /dev/ttyAMA1
    #[arg(long)]
    pub device: Option<String>,

    /// Baud rate of the serial line [default: 115200]
    #[arg(long)]
    pub baud: Option<u32>,

    /// Wait (ms) after the client connects before sending the break [default: 10]
    #[arg(long = "break-delay", value_name = "MS")]
    pub break_delay: Option<u64>,

    /// Length (ms) of the break pulse on the UART [default: 10]
    #[arg(long = "break-length", value_name = "MS")]
    pub break_length: Option<u64>,

    /// TOML file with defaults for any of the options above
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Settings given on the command line
    pub fn overrides(&self) -> PartialBridgeConfig {
        PartialBridgeConfig {
            host: self.host.clone(),
            port: self.port,
            device: self.device.clone(),
            baud_rate: self.baud,
            break_delay_ms: self.break_delay,
            break_length_ms: self.break_length,
        }
    }
}
