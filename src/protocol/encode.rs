//! Pure encoding: Command → SYN6288 wire frame.
//!
//! No I/O, no side effects. The frame is built in a caller-owned scratch
//! buffer so a driver handle can reuse one buffer for every command.

use crate::domain::{Syn6288Error, Syn6288Result};

use super::{Command, FrameBuffer, FRAME_HEADER, MAX_PAYLOAD_LEN};

/// XOR of every byte in `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Encode `cmd` into `frame`, returning the number of bytes to send.
///
/// Payloads longer than 200 bytes are rejected and `frame` is left untouched.
pub fn encode_into(cmd: &Command<'_>, frame: &mut FrameBuffer) -> Syn6288Result<usize> {
    let (body, selector) = cmd.payload();
    let payload_len = body.len() + usize::from(selector.is_some());
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(Syn6288Error::InvalidArgument(format!(
            "payload of {payload_len} bytes exceeds the {MAX_PAYLOAD_LEN}-byte limit"
        )));
    }

    let param = cmd.param();
    // command + optional param + payload + checksum
    let length = 1 + usize::from(param.is_some()) + payload_len + 1;

    frame[0] = FRAME_HEADER;
    frame[1..3].copy_from_slice(&(length as u16).to_be_bytes());
    frame[3] = cmd.code();
    let mut pos = 4;
    if let Some(param) = param {
        frame[pos] = param;
        pos += 1;
    }
    frame[pos..pos + body.len()].copy_from_slice(body);
    pos += body.len();
    if let Some(selector) = selector {
        frame[pos] = selector;
        pos += 1;
    }
    frame[pos] = checksum(&frame[..pos]);
    Ok(pos + 1)
}
