//! Core domain types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Syn6288Error, Syn6288Result};

/// Encoding of the text bytes handed to the synthesizer.
///
/// The driver never transcodes; the value only tells the chip how to read
/// the payload. It occupies the low two bits of the text frame's parameter byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    #[default]
    Gb2312 = 0x00,
    Gbk = 0x01,
    Big5 = 0x02,
    Unicode = 0x03,
}

impl TextType {
    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl FromStr for TextType {
    type Err = Syn6288Error;

    fn from_str(s: &str) -> Syn6288Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gb2312" => Ok(Self::Gb2312),
            "gbk" => Ok(Self::Gbk),
            "big5" => Ok(Self::Big5),
            "unicode" => Ok(Self::Unicode),
            other => Err(Syn6288Error::InvalidArgument(format!(
                "unknown text type '{other}'"
            ))),
        }
    }
}

/// Play mode, bit-packed the way the chip expects it.
///
/// `0` is plain synthesis; background track `n` (1-15) is encoded as `n << 3`
/// so it can be OR-ed with a [`TextType`] into one parameter byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode(u8);

impl Mode {
    pub const COMMON: Mode = Mode(0);
    pub const BACKGROUND_TRACKS: u8 = 15;

    /// Background music track `track` (1..=15); `0` yields [`Mode::COMMON`].
    pub fn background(track: u8) -> Syn6288Result<Self> {
        if track > Self::BACKGROUND_TRACKS {
            return Err(Syn6288Error::InvalidArgument(format!(
                "background track {track} out of range 0-{}",
                Self::BACKGROUND_TRACKS
            )));
        }
        Ok(Self(track << 3))
    }

    /// Raw parameter-byte bits.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Selected background track, `None` in common mode.
    pub fn background_track(self) -> Option<u8> {
        match self.0 >> 3 {
            0 => None,
            n => Some(n),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.background_track() {
            None => write!(f, "common"),
            Some(n) => write!(f, "background {n}"),
        }
    }
}

/// UART speeds the chip can be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaudRate {
    #[default]
    Bps9600 = 0x00,
    Bps19200 = 0x01,
    Bps38400 = 0x02,
}

impl BaudRate {
    /// Parameter byte of the set-baud frame.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn bps(self) -> u32 {
        match self {
            Self::Bps9600 => 9600,
            Self::Bps19200 => 19200,
            Self::Bps38400 => 38400,
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = Syn6288Error;

    fn try_from(bps: u32) -> Syn6288Result<Self> {
        match bps {
            9600 => Ok(Self::Bps9600),
            19200 => Ok(Self::Bps19200),
            38400 => Ok(Self::Bps38400),
            other => Err(Syn6288Error::InvalidArgument(format!(
                "unsupported baud rate {other} (expected 9600, 19200 or 38400)"
            ))),
        }
    }
}

/// Playback state reported by the status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Busy,
}

/// Validate a canned-audio selector letter and fold it to the lower-case
/// byte the chip expects.
fn fold_selector(kind: &str, letter: char, last: char) -> Syn6288Result<u8> {
    let upper = letter.to_ascii_uppercase();
    if ('A'..=last).contains(&upper) {
        Ok(upper.to_ascii_lowercase() as u8)
    } else {
        Err(Syn6288Error::InvalidArgument(format!(
            "{kind} '{letter}' out of range A-{last}"
        )))
    }
}

fn single_letter(kind: &str, s: &str) -> Syn6288Result<char> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Syn6288Error::InvalidArgument(format!(
            "{kind} must be a single letter, got '{s}'"
        ))),
    }
}

/// Built-in prompt sound, `A`-`Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sound(u8);

impl Sound {
    pub const LAST: char = 'Y';

    pub fn new(letter: char) -> Syn6288Result<Self> {
        fold_selector("sound", letter, Self::LAST).map(Self)
    }

    /// Selector byte as sent on the wire (lower case).
    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl FromStr for Sound {
    type Err = Syn6288Error;

    fn from_str(s: &str) -> Syn6288Result<Self> {
        Self::new(single_letter("sound", s)?)
    }
}

/// Built-in message tone, `A`-`H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message(u8);

impl Message {
    pub const LAST: char = 'H';

    pub fn new(letter: char) -> Syn6288Result<Self> {
        fold_selector("message", letter, Self::LAST).map(Self)
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl FromStr for Message {
    type Err = Syn6288Error;

    fn from_str(s: &str) -> Syn6288Result<Self> {
        Self::new(single_letter("message", s)?)
    }
}

/// Built-in ring tone, `A`-`O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring(u8);

impl Ring {
    pub const LAST: char = 'O';

    pub fn new(letter: char) -> Syn6288Result<Self> {
        fold_selector("ring", letter, Self::LAST).map(Self)
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl FromStr for Ring {
    type Err = Syn6288Error;

    fn from_str(s: &str) -> Syn6288Result<Self> {
        Self::new(single_letter("ring", s)?)
    }
}

/// Static chip and driver description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChipInfo {
    pub chip_name: &'static str,
    pub manufacturer_name: &'static str,
    pub interface: &'static str,
    pub supply_voltage_min_v: f32,
    pub supply_voltage_max_v: f32,
    pub max_current_ma: f32,
    pub temperature_min: f32,
    pub temperature_max: f32,
    pub driver_version: u32,
}

impl ChipInfo {
    pub const SYN6288: ChipInfo = ChipInfo {
        chip_name: "YuToneWorld SYN6288",
        manufacturer_name: "YuToneWorld",
        interface: "UART",
        supply_voltage_min_v: 2.4,
        supply_voltage_max_v: 5.1,
        max_current_ma: 280.0,
        temperature_min: -35.0,
        temperature_max: 85.0,
        driver_version: 2000,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_background_15_packs_to_0x78() {
        let mode = Mode::background(15).unwrap();
        assert_eq!(mode.bits(), 0x78);
        assert_eq!(mode.background_track(), Some(15));
    }

    #[test]
    fn mode_zero_is_common() {
        assert_eq!(Mode::background(0).unwrap(), Mode::COMMON);
        assert_eq!(Mode::COMMON.background_track(), None);
    }

    #[test]
    fn mode_rejects_track_16() {
        assert!(matches!(
            Mode::background(16),
            Err(Syn6288Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn mode_or_text_type_fills_parameter_byte() {
        let param = Mode::background(15).unwrap().bits() | TextType::Unicode.bits();
        assert_eq!(param, 0x7B);
    }

    #[test]
    fn baud_rate_from_bps() {
        assert_eq!(BaudRate::try_from(9600).unwrap(), BaudRate::Bps9600);
        assert_eq!(BaudRate::try_from(19200).unwrap().code(), 0x01);
        assert_eq!(BaudRate::try_from(38400).unwrap().bps(), 38400);
        assert!(BaudRate::try_from(115200).is_err());
    }

    #[test]
    fn sound_folds_to_lower_case() {
        assert_eq!(Sound::new('A').unwrap().as_byte(), b'a');
        assert_eq!(Sound::new('y').unwrap().as_byte(), b'y');
    }

    #[test]
    fn selectors_reject_letters_past_their_range() {
        assert!(Sound::new('Z').is_err());
        assert!(Message::new('I').is_err());
        assert!(Ring::new('P').is_err());
        assert!(Ring::new('1').is_err());
    }

    #[test]
    fn selectors_accept_range_edges() {
        assert_eq!(Message::new('H').unwrap().as_byte(), b'h');
        assert_eq!(Ring::new('o').unwrap().as_byte(), b'o');
    }

    #[test]
    fn selector_parses_from_single_letter_only() {
        assert_eq!("c".parse::<Sound>().unwrap().as_byte(), b'c');
        assert!("ab".parse::<Sound>().is_err());
        assert!("".parse::<Ring>().is_err());
    }

    #[test]
    fn mode_displays_track() {
        assert_eq!(Mode::COMMON.to_string(), "common");
        assert_eq!(Mode::background(3).unwrap().to_string(), "background 3");
    }

    #[test]
    fn status_and_info_serialize_for_cli_output() {
        assert_eq!(serde_json::to_string(&Status::Busy).unwrap(), r#""busy""#);
        let info = serde_json::to_value(ChipInfo::SYN6288).unwrap();
        assert_eq!(info["chip_name"], "YuToneWorld SYN6288");
        assert_eq!(info["driver_version"], 2000);
    }

    #[test]
    fn text_type_parses_case_insensitively() {
        assert_eq!("GBK".parse::<TextType>().unwrap(), TextType::Gbk);
        assert!("utf8".parse::<TextType>().is_err());
    }
}
