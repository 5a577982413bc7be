// Serial module - Serial line access
pub mod transport;

pub use transport::{SerialLine, SerialTransport};
