//! Pure decoding: acknowledgement bytes → typed result, wire frame → Frame.
//!
//! No I/O, no side effects. The chip answers every frame with a single 'A'
//! except the status query, which gets a two-byte "AO" (idle) or "AN" (busy).

use crate::domain::{Status, Syn6288Error, Syn6288Result};

use super::{
    checksum, hex, ACK, CMD_SET_BAUD, CMD_SYNTHESIS, FRAME_HEADER, STATUS_BUSY, STATUS_IDLE,
};

/// Accept exactly one `0x41` byte; anything else (including nothing) is a NAK.
pub fn decode_ack(response: &[u8]) -> Syn6288Result<()> {
    match response {
        [ACK] => Ok(()),
        [] => Err(Syn6288Error::Nack("no acknowledgement received".into())),
        other => Err(Syn6288Error::Nack(format!(
            "expected ack 41, got '{}'",
            hex(other)
        ))),
    }
}

/// Parse a status reply. `None` means the pair was not recognised and the
/// query should be retried.
pub fn decode_status(response: &[u8]) -> Option<Status> {
    match response {
        [ACK, STATUS_IDLE] => Some(Status::Idle),
        [ACK, STATUS_BUSY] => Some(Status::Busy),
        _ => None,
    }
}

/// A validated frame as seen on the wire
#[derive(Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    pub command: u8,
    pub param: Option<u8>,
    pub payload: &'a [u8],
}

/// Validate header, length and checksum of a complete frame.
///
/// Only synthesis and set-baud frames carry a parameter byte.
pub fn parse_frame(bytes: &[u8]) -> Syn6288Result<Frame<'_>> {
    let invalid = |why: &str| Syn6288Error::InvalidArgument(format!("{why}: '{}'", hex(bytes)));

    if bytes.len() < 5 {
        return Err(invalid("frame too short"));
    }
    if bytes[0] != FRAME_HEADER {
        return Err(invalid("bad frame header"));
    }
    let length = usize::from(u16::from_be_bytes([bytes[1], bytes[2]]));
    if length != bytes.len() - 3 {
        return Err(invalid("length field does not match frame size"));
    }
    let (body, last) = bytes.split_at(bytes.len() - 1);
    if checksum(body) != last[0] {
        return Err(invalid("checksum mismatch"));
    }

    let command = bytes[3];
    let (param, payload) = match command {
        CMD_SYNTHESIS | CMD_SET_BAUD => match body.get(4) {
            Some(&param) => (Some(param), &body[5..]),
            None => return Err(invalid("missing parameter byte")),
        },
        _ => (None, &body[4..]),
    };
    Ok(Frame {
        command,
        param,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{encode_into, Command, CMD_STATUS, FRAME_BUFFER_SIZE};

    // --- Single-byte ack ---

    #[test]
    fn ack_accepted() {
        assert!(decode_ack(&[0x41]).is_ok());
    }

    #[test]
    fn wrong_ack_byte_is_nak() {
        assert!(matches!(decode_ack(&[0x45]), Err(Syn6288Error::Nack(_))));
    }

    #[test]
    fn short_read_is_nak() {
        assert!(matches!(decode_ack(&[]), Err(Syn6288Error::Nack(_))));
    }

    #[test]
    fn extra_bytes_are_nak() {
        assert!(decode_ack(&[0x41, 0x41]).is_err());
    }

    // --- Status ---

    #[test]
    fn status_idle() {
        assert_eq!(decode_status(b"AO"), Some(Status::Idle));
    }

    #[test]
    fn status_busy() {
        assert_eq!(decode_status(b"AN"), Some(Status::Busy));
    }

    #[test]
    fn status_unrecognised() {
        assert_eq!(decode_status(b"AX"), None);
        assert_eq!(decode_status(b"OA"), None);
        assert_eq!(decode_status(b"A"), None);
        assert_eq!(decode_status(&[]), None);
    }

    // --- Frame parsing ---

    #[test]
    fn parse_status_frame() {
        let frame = parse_frame(&[0xFD, 0x00, 0x02, 0x21, 0xDE]).unwrap();
        assert_eq!(frame.command, CMD_STATUS);
        assert_eq!(frame.param, None);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn parse_text_frame() {
        let mut buf = [0u8; FRAME_BUFFER_SIZE];
        let n = encode_into(&Command::Text { text: b"hi", param: 0x7B }, &mut buf).unwrap();
        let frame = parse_frame(&buf[..n]).unwrap();
        assert_eq!(frame.command, CMD_SYNTHESIS);
        assert_eq!(frame.param, Some(0x7B));
        assert_eq!(frame.payload, b"hi");
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        assert!(parse_frame(&[0xFD, 0x00, 0x02, 0x21, 0xDF]).is_err());
    }

    #[test]
    fn parse_rejects_bad_header() {
        assert!(parse_frame(&[0xFE, 0x00, 0x02, 0x21, 0xDF]).is_err());
    }

    #[test]
    fn parse_rejects_length_mismatch() {
        // Length claims 3 bytes follow, only 2 do
        assert!(parse_frame(&[0xFD, 0x00, 0x03, 0x21, 0xDF]).is_err());
    }

    #[test]
    fn parse_rejects_truncated_frame() {
        assert!(parse_frame(&[0xFD, 0x00]).is_err());
    }
}
