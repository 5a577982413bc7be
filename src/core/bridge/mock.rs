// Recording serial line used by the bridge tests
use crate::infrastructure::serial::SerialLine;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SerialEvent {
    Break(Duration),
    Read(usize),
    Write(Vec<u8>),
}

#[derive(Debug, Default)]
pub(crate) struct MockSerial {
    events: Vec<(Instant, SerialEvent)>,
    replies: VecDeque<Vec<u8>>,
    break_window: Option<(Instant, Instant)>,
    fail_break: bool,
    fail_read: bool,
    fail_write: bool,
}

fn io_failure(what: &str) -> serialport::Error {
    serialport::Error::new(
        serialport::ErrorKind::Io(std::io::ErrorKind::BrokenPipe),
        format!("{} failed", what),
    )
}

impl MockSerial {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for a later read; each read takes one reply
    pub(crate) fn reply(mut self, data: &[u8]) -> Self {
        self.replies.push_back(data.to_vec());
        self
    }

    pub(crate) fn fail_break(mut self) -> Self {
        self.fail_break = true;
        self
    }

    pub(crate) fn fail_read(mut self) -> Self {
        self.fail_read = true;
        self
    }

    pub(crate) fn fail_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    pub(crate) fn events(&self) -> &[(Instant, SerialEvent)] {
        &self.events
    }

    pub(crate) fn kinds(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .map(|(_, event)| match event {
                SerialEvent::Break(_) => "break",
                SerialEvent::Read(_) => "read",
                SerialEvent::Write(_) => "write",
            })
            .collect()
    }

    pub(crate) fn written(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|(_, event)| match event {
                SerialEvent::Write(data) => Some(data.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    pub(crate) fn break_window(&self) -> Option<(Instant, Instant)> {
        self.break_window
    }
}

#[async_trait]
impl SerialLine for MockSerial {
    async fn read(&mut self, max_bytes: usize) -> serialport::Result<Vec<u8>> {
        self.events.push((Instant::now(), SerialEvent::Read(max_bytes)));
        if self.fail_read {
            return Err(io_failure("read"));
        }

        let mut data = self.replies.pop_front().unwrap_or_default();
        if data.len() > max_bytes {
            let rest = data.split_off(max_bytes);
            self.replies.push_front(rest);
        }
        Ok(data)
    }

    async fn write(&mut self, data: &[u8]) -> serialport::Result<()> {
        self.events
            .push((Instant::now(), SerialEvent::Write(data.to_vec())));
        if self.fail_write {
            return Err(io_failure("write"));
        }
        Ok(())
    }

    async fn send_break(&mut self, duration: Duration) -> serialport::Result<()> {
        let start = Instant::now();
        self.events.push((start, SerialEvent::Break(duration)));
        if self.fail_break {
            return Err(io_failure("break"));
        }

        tokio::time::sleep(duration).await;
        self.break_window = Some((start, Instant::now()));
        Ok(())
    }
}
