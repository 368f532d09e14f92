//! Serial port adapter using the `serialport` crate
//!
//! Implements `SerialFactory` and `SerialConnection` traits.
//! `SerialPortFactory` has no instance data, just static methods for
//! listing ports and building connections.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::ClearBuffer;

use crate::domain::{Syn6288Error, Syn6288Result};
use crate::ports::{SerialConnection, SerialFactory, SerialPortInfo};

/// Per-read timeout; the session retries a few reads when the chip is slow
const READ_TIMEOUT_MS: u64 = 100;

/// Zero-sized factory for creating serial port connections.
pub struct SerialPortFactory;

impl SerialFactory for SerialPortFactory {
    fn list_ports() -> Syn6288Result<Vec<SerialPortInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| Syn6288Error::Transport(format!("Failed to list ports: {e}")))?;

        Ok(ports
            .into_iter()
            .map(|p| {
                let port_type = match &p.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        format!("USB ({:04X}:{:04X})", info.vid, info.pid)
                    }
                    serialport::SerialPortType::PciPort => "PCI".to_string(),
                    serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                    serialport::SerialPortType::Unknown => "Native".to_string(),
                };
                SerialPortInfo {
                    name: p.port_name,
                    port_type,
                }
            })
            .collect())
    }

    fn connection(port: &str, baud_rate: u32) -> Box<dyn SerialConnection> {
        Box::new(SerialPortConnection::new(port, baud_rate))
    }
}

/// A UART connection wrapping the `serialport` crate, opened on demand.
pub struct SerialPortConnection {
    name: String,
    baud_rate: u32,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialPortConnection {
    pub fn new(name: &str, baud_rate: u32) -> Self {
        Self {
            name: name.to_string(),
            baud_rate,
            port: None,
        }
    }

    fn port(&mut self) -> Syn6288Result<&mut Box<dyn serialport::SerialPort>> {
        let name = &self.name;
        self.port
            .as_mut()
            .ok_or_else(|| Syn6288Error::Transport(format!("{name} is not open")))
    }
}

impl SerialConnection for SerialPortConnection {
    fn open(&mut self) -> Syn6288Result<()> {
        let port = serialport::new(&self.name, self.baud_rate)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()
            .map_err(|e| Syn6288Error::Transport(format!("Failed to open {}: {e}", self.name)))?;
        log::info!("Opened {} at {} bps", self.name, self.baud_rate);
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> Syn6288Result<()> {
        // Dropping the handle releases the OS port
        if self.port.take().is_some() {
            log::info!("Closed {}", self.name);
        }
        Ok(())
    }

    fn flush(&mut self) -> Syn6288Result<()> {
        self.port()?
            .clear(ClearBuffer::Input)
            .map_err(|e| Syn6288Error::Transport(format!("Flush failed: {e}")))
    }

    fn write(&mut self, data: &[u8]) -> Syn6288Result<usize> {
        let port = self.port()?;
        port.write_all(data)
            .and_then(|_| port.flush())
            .map(|_| data.len())
            .map_err(|e| Syn6288Error::Transport(format!("Write failed: {e}")))
    }

    fn read(&mut self, buffer: &mut [u8]) -> Syn6288Result<usize> {
        match self.port()?.read(buffer) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(Syn6288Error::Transport(format!("Read failed: {e}"))),
        }
    }
}
