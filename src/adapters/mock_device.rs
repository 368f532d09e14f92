//! Simulated SYN6288 for development and testing without hardware.
//!
//! Activate from the command line with `--mock`:
//!
//!   RUST_LOG=syn6288_lib=info syn6288 --mock say "hello"
//!
//! Every frame the driver writes is validated and logged at INFO level so
//! you can verify exactly what a real chip would receive.

use std::collections::VecDeque;

use crate::domain::{Syn6288Error, Syn6288Result};
use crate::ports::SerialConnection;
use crate::protocol::{
    hex, parse_frame, Frame, ACK, CMD_PAUSE, CMD_POWER_DOWN, CMD_RESUME, CMD_SET_BAUD,
    CMD_STATUS, CMD_STOP, CMD_SYNTHESIS, STATUS_BUSY, STATUS_IDLE,
};

/// Status polls answered "busy" after each synthesis command
const DEFAULT_BUSY_POLLS: u32 = 2;

pub struct MockSyn6288 {
    open: bool,
    rx: VecDeque<u8>,
    busy_polls: u32,
    busy_remaining: u32,
    paused: bool,
}

impl MockSyn6288 {
    pub fn new() -> Self {
        Self::with_busy_polls(DEFAULT_BUSY_POLLS)
    }

    /// Report busy for `polls` status queries after every synthesis command.
    pub fn with_busy_polls(polls: u32) -> Self {
        log::info!("[MOCK SYN6288] Initialized, busy for {polls} polls per utterance");
        Self {
            open: false,
            rx: VecDeque::new(),
            busy_polls: polls,
            busy_remaining: 0,
            paused: false,
        }
    }

    /// Work out the chip's reply to one valid frame.
    fn respond(&mut self, frame: &Frame<'_>) -> Option<Vec<u8>> {
        match frame.command {
            CMD_STATUS => {
                // A paused chip is still mid-utterance
                let busy = self.paused || self.busy_remaining > 0;
                if busy && !self.paused {
                    self.busy_remaining -= 1;
                }
                let state = if busy { STATUS_BUSY } else { STATUS_IDLE };
                log::info!(
                    "[MOCK SYN6288] STATUS → {}",
                    if busy { "busy" } else { "idle" }
                );
                Some(vec![ACK, state])
            }
            CMD_SYNTHESIS => {
                let text = String::from_utf8_lossy(frame.payload);
                if is_setting(frame.payload) {
                    log::info!("[MOCK SYN6288] SETTING → {text}");
                } else {
                    log::info!(
                        "[MOCK SYN6288] SPEAK (param {:02x}) → {text}",
                        frame.param.unwrap_or(0)
                    );
                    self.busy_remaining = self.busy_polls;
                    self.paused = false;
                }
                Some(vec![ACK])
            }
            CMD_STOP => {
                log::info!("[MOCK SYN6288] STOP");
                self.busy_remaining = 0;
                self.paused = false;
                Some(vec![ACK])
            }
            CMD_PAUSE => {
                log::info!("[MOCK SYN6288] PAUSE");
                self.paused = self.busy_remaining > 0;
                Some(vec![ACK])
            }
            CMD_RESUME => {
                log::info!("[MOCK SYN6288] RESUME");
                self.paused = false;
                Some(vec![ACK])
            }
            CMD_POWER_DOWN => {
                log::info!("[MOCK SYN6288] POWER DOWN");
                Some(vec![ACK])
            }
            CMD_SET_BAUD => {
                log::info!("[MOCK SYN6288] SET BAUD → code {:?}", frame.param);
                Some(vec![ACK])
            }
            other => {
                log::warn!("[MOCK SYN6288] unknown command {other:02x}, ignoring");
                None
            }
        }
    }
}

impl Default for MockSyn6288 {
    fn default() -> Self {
        Self::new()
    }
}

/// `v[6]`, `m[0]`, `t[3]`: bracket-tagged settings rather than speech
fn is_setting(payload: &[u8]) -> bool {
    match payload {
        [tag, b'[', digits @ .., b']'] => {
            tag.is_ascii_lowercase()
                && !digits.is_empty()
                && digits.iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

impl SerialConnection for MockSyn6288 {
    fn open(&mut self) -> Syn6288Result<()> {
        self.open = true;
        log::info!("[MOCK SYN6288] UART open");
        Ok(())
    }

    fn close(&mut self) -> Syn6288Result<()> {
        self.open = false;
        log::info!("[MOCK SYN6288] UART closed");
        Ok(())
    }

    fn flush(&mut self) -> Syn6288Result<()> {
        self.rx.clear();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Syn6288Result<usize> {
        if !self.open {
            return Err(Syn6288Error::Transport("mock UART is not open".into()));
        }
        match parse_frame(data) {
            Ok(frame) => {
                if let Some(reply) = self.respond(&frame) {
                    self.rx.extend(reply);
                }
            }
            Err(e) => log::warn!("[MOCK SYN6288] dropped malformed frame {}: {e}", hex(data)),
        }
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Syn6288Result<usize> {
        let n = buffer.len().min(self.rx.len());
        for (slot, byte) in buffer.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sound;
    use crate::protocol::{encode_into, Command, FRAME_BUFFER_SIZE};

    fn send(mock: &mut MockSyn6288, cmd: Command<'_>) -> Vec<u8> {
        let mut frame = [0u8; FRAME_BUFFER_SIZE];
        let n = encode_into(&cmd, &mut frame).unwrap();
        mock.flush().unwrap();
        mock.write(&frame[..n]).unwrap();
        let mut reply = [0u8; 4];
        let got = mock.read(&mut reply).unwrap();
        reply[..got].to_vec()
    }

    fn open_mock(polls: u32) -> MockSyn6288 {
        let mut mock = MockSyn6288::with_busy_polls(polls);
        mock.open().unwrap();
        mock
    }

    #[test]
    fn write_before_open_fails() {
        let mut mock = MockSyn6288::new();
        assert!(mock.write(&[0xFD, 0x00, 0x02, 0x21, 0xDE]).is_err());
    }

    #[test]
    fn idle_chip_answers_ao() {
        let mut mock = open_mock(2);
        assert_eq!(send(&mut mock, Command::Status), b"AO");
    }

    #[test]
    fn speech_keeps_chip_busy_for_configured_polls() {
        let mut mock = open_mock(2);
        assert_eq!(send(&mut mock, Command::Text { text: b"hi", param: 0 }), b"A");
        assert_eq!(send(&mut mock, Command::Status), b"AN");
        assert_eq!(send(&mut mock, Command::Status), b"AN");
        assert_eq!(send(&mut mock, Command::Status), b"AO");
    }

    #[test]
    fn settings_do_not_start_playback() {
        let mut mock = open_mock(2);
        assert_eq!(send(&mut mock, Command::Raw("v[6]")), b"A");
        assert_eq!(send(&mut mock, Command::Status), b"AO");
    }

    #[test]
    fn stop_ends_playback() {
        let mut mock = open_mock(5);
        send(&mut mock, Command::Sound(Sound::new('B').unwrap()));
        assert_eq!(send(&mut mock, Command::Stop), b"A");
        assert_eq!(send(&mut mock, Command::Status), b"AO");
    }

    #[test]
    fn paused_chip_stays_busy_until_resumed() {
        let mut mock = open_mock(1);
        send(&mut mock, Command::Text { text: b"long", param: 0 });
        send(&mut mock, Command::Pause);
        assert_eq!(send(&mut mock, Command::Status), b"AN");
        assert_eq!(send(&mut mock, Command::Status), b"AN");
        send(&mut mock, Command::Resume);
        assert_eq!(send(&mut mock, Command::Status), b"AN");
        assert_eq!(send(&mut mock, Command::Status), b"AO");
    }

    #[test]
    fn malformed_frame_gets_no_reply() {
        let mut mock = open_mock(0);
        mock.write(&[0xFD, 0x00, 0x02, 0x21, 0x00]).unwrap();
        let mut reply = [0u8; 2];
        assert_eq!(mock.read(&mut reply).unwrap(), 0);
    }

    #[test]
    fn setting_payload_detection() {
        assert!(is_setting(b"v[16]"));
        assert!(is_setting(b"t[0]"));
        assert!(!is_setting(b"v[]"));
        assert!(!is_setting(b"hello"));
        assert!(!is_setting(b"[v6]"));
    }
}
