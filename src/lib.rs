//! SYN6288 Speech Synthesis Driver
//!
//! Drives a YuToneWorld SYN6288 text-to-speech chip over a UART: builds its
//! command frames, checks its acknowledgements and keeps the settings last
//! written to it.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `ports/` - Trait definitions (interfaces) for the UART, delay and diagnostics
//! - `protocol/` - SYN6288 frame encoding, ack decoding and exchange timing
//! - `driver` - The `Syn6288` device handle and its command surface
//! - `adapters/` - Implementations of ports (serialport, thread sleep, log, mock chip)
//!
//! ## Example
//!
//! ```no_run
//! use syn6288_lib::adapters::{LogSink, SerialPortFactory, ThreadDelay};
//! use syn6288_lib::ports::SerialFactory;
//! use syn6288_lib::Syn6288;
//!
//! # fn main() -> Result<(), syn6288_lib::domain::Syn6288Error> {
//! let mut tts = Syn6288::with_bindings(
//!     SerialPortFactory::connection("/dev/ttyUSB0", 9600),
//!     Box::new(ThreadDelay),
//!     Box::new(LogSink::new()),
//! );
//! tts.init()?;
//! tts.set_volume(12)?;
//! tts.synthesis_text(b"hello")?;
//! tts.sync()?;
//! tts.deinit()?;
//! # Ok(())
//! # }
//! ```

// Core domain (pure, no I/O)
pub mod domain;
pub mod ports;
pub mod protocol;

// Device handle
pub mod driver;

// Adapters (external I/O)
pub mod adapters;

pub use driver::Syn6288;
