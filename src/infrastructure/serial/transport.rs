use crate::domain::error::{BreakBridgeError, BreakBridgeResult, Phase};
use async_trait::async_trait;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Per-call read timeout. An expired read means "nothing pending".
pub const READ_TIMEOUT: Duration = Duration::from_millis(1);

/// Byte-level access to a serial line
#[async_trait]
pub trait SerialLine: Send {
    /// Read up to `max_bytes`. An empty result means nothing arrived within
    /// the line's timeout and is not an error.
    async fn read(&mut self, max_bytes: usize) -> serialport::Result<Vec<u8>>;

    /// Write every byte of `data` or fail
    async fn write(&mut self, data: &[u8]) -> serialport::Result<()>;

    /// Hold the line in a break condition for `duration`, then release it
    async fn send_break(&mut self, duration: Duration) -> serialport::Result<()>;
}

/// An open 8-N-1 serial line
pub struct SerialTransport {
    path: String,
    baud_rate: u32,
    port: Arc<Mutex<Box<dyn SerialPort>>>,
}

impl SerialTransport {
    pub fn open(path: &str, baud_rate: u32) -> BreakBridgeResult<Self> {
        info!("Opening serial port on {} at baud rate {}", path, baud_rate);

        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| BreakBridgeError::device(Phase::Open, e))?;

        debug!("Serial port {} opened", path);

        Ok(Self {
            path: path.to_string(),
            baud_rate,
            port: Arc::new(Mutex::new(port)),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    // Port calls block, so they run on the blocking pool with the lock held
    // for the whole call.
    async fn with_port<T, F>(&self, f: F) -> serialport::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Box<dyn SerialPort>) -> serialport::Result<T> + Send + 'static,
    {
        let port = Arc::clone(&self.port);
        tokio::task::spawn_blocking(move || {
            let mut port = port.blocking_lock();
            f(&mut *port)
        })
        .await
        .map_err(|e| {
            serialport::Error::new(
                serialport::ErrorKind::Unknown,
                format!("serial worker task failed: {}", e),
            )
        })?
    }
}

#[async_trait]
impl SerialLine for SerialTransport {
    async fn read(&mut self, max_bytes: usize) -> serialport::Result<Vec<u8>> {
        self.with_port(move |port| {
            let mut buffer = vec![0u8; max_bytes];
            match port.read(&mut buffer) {
                Ok(n) => {
                    buffer.truncate(n);
                    Ok(buffer)
                }
                Err(ref e) if e.kind() == io::ErrorKind::TimedOut => Ok(Vec::new()),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn write(&mut self, data: &[u8]) -> serialport::Result<()> {
        let data = data.to_vec();
        self.with_port(move |port| {
            // The short timeout applies to writes too; resume until the
            // line has taken everything.
            let mut written = 0;
            while written < data.len() {
                match port.write(&data[written..]) {
                    Ok(0) => {
                        return Err(io::Error::new(
                            io::ErrorKind::WriteZero,
                            "serial line accepted no bytes",
                        )
                        .into())
                    }
                    Ok(n) => written += n,
                    Err(ref e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                        ) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            port.flush()?;
            Ok(())
        })
        .await
    }

    async fn send_break(&mut self, duration: Duration) -> serialport::Result<()> {
        self.with_port(move |port| {
            port.set_break()?;
            std::thread::sleep(duration);
            port.clear_break()
        })
        .await
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .field("baud_rate", &self.baud_rate)
            .finish()
    }
}
