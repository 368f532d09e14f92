//! Serial port traits
//!
//! Split into two traits:
//! - `SerialFactory`: static methods for listing ports and building connections
//! - `SerialConnection`: the UART operations the driver core calls

use crate::domain::Syn6288Result;

/// Information about a serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    pub name: String,
    pub port_type: String,
}

/// Factory for creating serial connections.
pub trait SerialFactory {
    /// List available serial ports on the system
    fn list_ports() -> Syn6288Result<Vec<SerialPortInfo>>;

    /// Build a connection for `port` at `baud_rate`. The port is not opened
    /// until the driver calls [`SerialConnection::open`] during `init`.
    fn connection(port: &str, baud_rate: u32) -> Box<dyn SerialConnection>;
}

/// The UART a SYN6288 hangs off.
/// Only requires `Send` (not `Sync`); one connection backs one driver handle.
pub trait SerialConnection: Send {
    /// Acquire the underlying port
    fn open(&mut self) -> Syn6288Result<()>;

    /// Release the underlying port
    fn close(&mut self) -> Syn6288Result<()>;

    /// Discard any bytes waiting in the receive buffer
    fn flush(&mut self) -> Syn6288Result<()>;

    /// Write bytes to the port, returning how many were accepted
    fn write(&mut self, data: &[u8]) -> Syn6288Result<usize>;

    /// Read available bytes into `buffer`. A read timeout is `Ok(0)`, not an error.
    fn read(&mut self, buffer: &mut [u8]) -> Syn6288Result<usize>;
}
