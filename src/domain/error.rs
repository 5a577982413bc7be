use thiserror::Error;

/// Stage of a run in which an error surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Open,
    Accept,
    Handshake,
    Forwarding,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Open => write!(f, "open"),
            Phase::Accept => write!(f, "accept"),
            Phase::Handshake => write!(f, "handshake"),
            Phase::Forwarding => write!(f, "forwarding"),
        }
    }
}

/// BreakBridge unified error type
#[derive(Error, Debug)]
pub enum BreakBridgeError {
    #[error("Serial device error during {phase}: {source}")]
    Device {
        phase: Phase,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection error during {phase}: {source}")]
    Bridge {
        phase: Phase,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl BreakBridgeError {
    pub fn device(phase: Phase, source: serialport::Error) -> Self {
        Self::Device { phase, source }
    }

    pub fn bridge(phase: Phase, source: std::io::Error) -> Self {
        Self::Bridge { phase, source }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Phase the error belongs to, if it happened at runtime
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Device { phase, .. } | Self::Bridge { phase, .. } => Some(*phase),
            Self::Bind { .. } | Self::Config { .. } => None,
        }
    }
}

pub type BreakBridgeResult<T> = Result<T, BreakBridgeError>;
