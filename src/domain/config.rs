use crate::domain::error::{BreakBridgeError, BreakBridgeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Resolved bridge configuration, immutable for the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Address to listen for the client on
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to listen for the client on
    pub port: u16,
    /// Serial device to forward, e.g. /dev/ttyAMA1
    pub device: String,
    /// Serial baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Wait between accepting the client and raising the break
    #[serde(default = "default_break_delay_ms")]
    pub break_delay_ms: u64,
    /// How long the break is held on the line
    #[serde(default = "default_break_length_ms")]
    pub break_length_ms: u64,
}

/// Any subset of the bridge settings, as found in a config file or on the
/// command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialBridgeConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub baud_rate: Option<u32>,
    #[serde(default)]
    pub break_delay_ms: Option<u64>,
    #[serde(default)]
    pub break_length_ms: Option<u64>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_break_delay_ms() -> u64 {
    10
}

fn default_break_length_ms() -> u64 {
    10
}

/// `host:port`, with IPv6 literals in brackets
pub fn format_listen_addr(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

impl BridgeConfig {
    pub fn new(port: u16, device: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port,
            device: device.into(),
            baud_rate: default_baud_rate(),
            break_delay_ms: default_break_delay_ms(),
            break_length_ms: default_break_length_ms(),
        }
    }

    pub fn break_delay(&self) -> Duration {
        Duration::from_millis(self.break_delay_ms)
    }

    pub fn break_length(&self) -> Duration {
        Duration::from_millis(self.break_length_ms)
    }

    /// Human readable listen address for logs and errors
    pub fn listen_addr(&self) -> String {
        format_listen_addr(&self.host, self.port)
    }

    pub fn validate(&self) -> BreakBridgeResult<()> {
        if self.host.trim().is_empty() {
            return Err(BreakBridgeError::config("listen host must not be empty"));
        }
        if self.device.trim().is_empty() {
            return Err(BreakBridgeError::config("serial device path must not be empty"));
        }
        if self.baud_rate == 0 {
            return Err(BreakBridgeError::config("baud rate must be greater than zero"));
        }
        Ok(())
    }
}

impl PartialBridgeConfig {
    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: PartialBridgeConfig) -> Self {
        Self {
            host: self.host.or(fallback.host),
            port: self.port.or(fallback.port),
            device: self.device.or(fallback.device),
            baud_rate: self.baud_rate.or(fallback.baud_rate),
            break_delay_ms: self.break_delay_ms.or(fallback.break_delay_ms),
            break_length_ms: self.break_length_ms.or(fallback.break_length_ms),
        }
    }

    /// Apply defaults and check the result. Port and device have no default.
    pub fn resolve(self) -> BreakBridgeResult<BridgeConfig> {
        let port = self
            .port
            .ok_or_else(|| BreakBridgeError::config("listen port is required (--port)"))?;
        let device = self
            .device
            .ok_or_else(|| BreakBridgeError::config("serial device is required (--device)"))?;

        let config = BridgeConfig {
            host: self.host.unwrap_or_else(default_host),
            port,
            device,
            baud_rate: self.baud_rate.unwrap_or_else(default_baud_rate),
            break_delay_ms: self.break_delay_ms.unwrap_or_else(default_break_delay_ms),
            break_length_ms: self.break_length_ms.unwrap_or_else(default_break_length_ms),
        };

        config.validate()?;
        Ok(config)
    }
}
