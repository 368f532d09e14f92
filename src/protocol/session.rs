//! Session: drives one request/response exchange with the chip.
//!
//! A Session borrows the handle's linked UART, delay and diagnostic sink plus
//! its frame buffer for the duration of one call. It owns the timing rules:
//! flush stale input, write the whole frame, wait for the chip to settle,
//! then read the acknowledgement.
//!
//! Pure translation lives in `encode` / `decode`. Session only handles I/O.

use log::Level;

use crate::domain::{Status, Syn6288Error, Syn6288Result};
use crate::ports::{Delay, DiagnosticSink, SerialConnection};

use super::{decode_ack, decode_status, encode_into, hex, Command, FrameBuffer};

/// Pause between writing a frame and reading the chip's answer
pub const SETTLE_DELAY_MS: u32 = 100;

/// Extra status queries after the first unrecognised reply
pub const STATUS_RETRIES: usize = 3;

/// Pause before each status retry
pub const STATUS_RETRY_DELAY_MS: u32 = 100;

/// Max read calls while collecting an answer (adapters time out ~100ms per call)
const RESPONSE_READ_ATTEMPTS: usize = 5;

/// Borrowed view of a handle's bindings for one exchange.
pub struct Session<'a> {
    serial: &'a mut dyn SerialConnection,
    delay: &'a mut dyn Delay,
    sink: &'a dyn DiagnosticSink,
    frame: &'a mut FrameBuffer,
}

impl<'a> Session<'a> {
    pub fn new(
        serial: &'a mut dyn SerialConnection,
        delay: &'a mut dyn Delay,
        sink: &'a dyn DiagnosticSink,
        frame: &'a mut FrameBuffer,
    ) -> Self {
        Self {
            serial,
            delay,
            sink,
            frame,
        }
    }

    /// Send a command that is answered with a single ack byte.
    pub fn execute(&mut self, cmd: &Command<'_>) -> Syn6288Result<()> {
        let len = self.encode(cmd)?;
        self.transmit(len)?;

        let mut ack = [0u8; 1];
        let n = self.read_response(&mut ack)?;
        decode_ack(&ack[..n]).map_err(|e| {
            self.sink.print(Level::Warn, "syn6288: command receive failed.");
            e
        })
    }

    /// Ask the chip whether it is still speaking.
    ///
    /// An unrecognised reply is retried up to [`STATUS_RETRIES`] more times
    /// before giving up with a NAK. Transport failures are never retried.
    pub fn query_status(&mut self) -> Syn6288Result<Status> {
        let len = self.encode(&Command::Status)?;
        let mut reply = [0u8; 2];
        let mut received = 0;

        for attempt in 0..=STATUS_RETRIES {
            if attempt > 0 {
                self.delay.delay_ms(STATUS_RETRY_DELAY_MS);
            }
            self.transmit(len)?;
            received = self.read_response(&mut reply)?;
            if let Some(status) = decode_status(&reply[..received]) {
                return Ok(status);
            }
            self.sink.print(
                Level::Debug,
                &format!(
                    "syn6288: unrecognised status reply '{}'",
                    hex(&reply[..received])
                ),
            );
        }

        self.sink.print(Level::Warn, "syn6288: command receive failed.");
        Err(Syn6288Error::Nack(format!(
            "no valid status after {} attempts, last reply '{}'",
            STATUS_RETRIES + 1,
            hex(&reply[..received])
        )))
    }

    /// Block for `ms` milliseconds using the linked delay.
    pub fn pause(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn encode(&mut self, cmd: &Command<'_>) -> Syn6288Result<usize> {
        encode_into(cmd, self.frame).map_err(|e| {
            self.sink.print(Level::Warn, &format!("syn6288: {e}"));
            e
        })
    }

    /// Flush, write the first `len` frame bytes, then wait for the chip.
    fn transmit(&mut self, len: usize) -> Syn6288Result<()> {
        self.serial
            .flush()
            .map_err(|e| self.transport_failure("uart flush failed", e))?;

        let frame = &self.frame[..len];
        self.sink.print(Level::Debug, &format!("TX: {}", hex(frame)));
        match self.serial.write(frame) {
            Ok(n) if n == len => {}
            Ok(n) => {
                return Err(self.transport_failure(
                    "uart write failed",
                    Syn6288Error::Transport(format!("short write: {n} of {len} bytes")),
                ))
            }
            Err(e) => return Err(self.transport_failure("uart write failed", e)),
        }

        self.delay.delay_ms(SETTLE_DELAY_MS);
        Ok(())
    }

    /// Fill `buf` from the UART, tolerating replies split across reads.
    /// Returns how many bytes arrived; fewer than `buf.len()` means the chip
    /// went quiet.
    fn read_response(&mut self, buf: &mut [u8]) -> Syn6288Result<usize> {
        let mut total = 0;
        for _ in 0..RESPONSE_READ_ATTEMPTS {
            match self.serial.read(&mut buf[total..]) {
                Ok(n) => {
                    total += n;
                    if total == buf.len() {
                        break;
                    }
                }
                Err(e) => return Err(self.transport_failure("uart read failed", e)),
            }
        }
        self.sink.print(Level::Debug, &format!("RX: {}", hex(&buf[..total])));
        Ok(total)
    }

    fn transport_failure(&self, what: &str, err: Syn6288Error) -> Syn6288Error {
        self.sink.print(Level::Warn, &format!("syn6288: {what}."));
        match err {
            Syn6288Error::Transport(_) => err,
            other => Syn6288Error::Transport(format!("{what}: {other}")),
        }
    }
}
