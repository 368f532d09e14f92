//! SYN6288 serial protocol.
//!
//! This module separates the three concerns of talking to the chip:
//! - `encode`: translate Command → wire frame (pure, no I/O)
//! - `decode`: translate acknowledgement bytes → typed result (pure, no I/O)
//! - `session`: drive flush/write/settle/read timing over the linked UART
//!
//! The encode/decode functions are pure so they can be tested without
//! any mock serial port.
//!
//! Frame layout (length is big-endian and counts every byte after itself):
//!
//! ```text
//! FD | len_hi len_lo | command | [param] | payload ... | xor of all previous bytes
//! ```

pub mod decode;
pub mod encode;
pub mod session;

pub use decode::{decode_ack, decode_status, parse_frame, Frame};
pub use encode::{checksum, encode_into};
pub use session::Session;

use crate::domain::{BaudRate, Message, Ring, Sound};

/// Sync byte opening every frame
pub const FRAME_HEADER: u8 = 0xFD;
/// Longest text or raw command the chip accepts in one frame
pub const MAX_PAYLOAD_LEN: usize = 200;
/// Header, two length bytes, command, param and checksum
pub const FRAME_OVERHEAD: usize = 6;
/// Scratch buffer size; comfortably holds the largest frame (206 bytes)
pub const FRAME_BUFFER_SIZE: usize = 256;

/// Reused per-handle scratch space for outgoing frames
pub type FrameBuffer = [u8; FRAME_BUFFER_SIZE];

/// Single-byte acknowledgement: command received ('A')
pub const ACK: u8 = 0x41;
/// Second status byte: chip idle ('O')
pub const STATUS_IDLE: u8 = 0x4F;
/// Second status byte: chip busy ('N')
pub const STATUS_BUSY: u8 = 0x4E;

pub const CMD_SYNTHESIS: u8 = 0x01;
pub const CMD_STOP: u8 = 0x02;
pub const CMD_PAUSE: u8 = 0x03;
pub const CMD_RESUME: u8 = 0x04;
pub const CMD_STATUS: u8 = 0x21;
pub const CMD_SET_BAUD: u8 = 0x31;
pub const CMD_POWER_DOWN: u8 = 0x88;

/// Commands understood by the SYN6288.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Busy/idle query, answered with two bytes
    Status,
    Stop,
    Pause,
    Resume,
    PowerDown,
    SetBaudRate(BaudRate),
    /// Pre-encoded text; `param` is `mode | text_type`
    Text { text: &'a [u8], param: u8 },
    Sound(Sound),
    Message(Message),
    Ring(Ring),
    /// Bracket-tagged control string such as `v[6]` or `t[3]`
    Raw(&'a str),
}

impl Command<'_> {
    /// Command code byte
    pub fn code(&self) -> u8 {
        match self {
            Command::Status => CMD_STATUS,
            Command::Stop => CMD_STOP,
            Command::Pause => CMD_PAUSE,
            Command::Resume => CMD_RESUME,
            Command::PowerDown => CMD_POWER_DOWN,
            Command::SetBaudRate(_) => CMD_SET_BAUD,
            Command::Text { .. }
            | Command::Sound(_)
            | Command::Message(_)
            | Command::Ring(_)
            | Command::Raw(_) => CMD_SYNTHESIS,
        }
    }

    /// Parameter byte, absent on the bare control frames
    pub fn param(&self) -> Option<u8> {
        match self {
            Command::Status
            | Command::Stop
            | Command::Pause
            | Command::Resume
            | Command::PowerDown => None,
            Command::SetBaudRate(rate) => Some(rate.code()),
            Command::Text { param, .. } => Some(*param),
            Command::Sound(_) | Command::Message(_) | Command::Ring(_) | Command::Raw(_) => {
                Some(0x00)
            }
        }
    }

    /// Payload as a literal body plus an optional trailing selector byte.
    pub fn payload(&self) -> (&[u8], Option<u8>) {
        match self {
            Command::Text { text, .. } => (*text, None),
            Command::Raw(command) => (command.as_bytes(), None),
            Command::Sound(sound) => (&b"sound"[..], Some(sound.as_byte())),
            Command::Message(message) => (&b"msg"[..], Some(message.as_byte())),
            Command::Ring(ring) => (&b"ring"[..], Some(ring.as_byte())),
            Command::Status
            | Command::Stop
            | Command::Pause
            | Command::Resume
            | Command::PowerDown
            | Command::SetBaudRate(_) => (&b""[..], None),
        }
    }
}

/// Frame-trace formatting, e.g. `fd 00 02 21 de`
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
