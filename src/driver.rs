//! Syn6288: the device handle.
//!
//! Owns the linked UART, delay and diagnostic sink, the settings last
//! written to the chip, and the scratch buffer every frame is built in.
//! Each command borrows those pieces as a [`Session`] for one exchange.
//!
//! A handle is not re-entrant. Callers sharing one across threads must
//! serialize access themselves (e.g. `Mutex<Syn6288>`).

use std::time::Duration;

use log::Level;

use crate::domain::{
    BaudRate, ChipInfo, DriverConfig, Message, Mode, Ring, Sound, Status, Syn6288Error,
    Syn6288Result, TextType, MAX_SPEED, MAX_VOLUME,
};
use crate::ports::{Delay, DiagnosticSink, SerialConnection};
use crate::protocol::{Command, FrameBuffer, Session, FRAME_BUFFER_SIZE};

/// Spacing between status polls while waiting for playback to finish
pub const SYNC_POLL_INTERVAL_MS: u32 = 500;

/// Gap between configuration steps when applying a profile
const CONFIGURE_STEP_DELAY_MS: u32 = 100;

pub struct Syn6288 {
    serial: Option<Box<dyn SerialConnection>>,
    delay: Option<Box<dyn Delay>>,
    sink: Option<Box<dyn DiagnosticSink>>,
    initialized: bool,
    text_type: TextType,
    mode: Mode,
    baud_rate: BaudRate,
    volume: u8,
    background_volume: u8,
    speed: u8,
    frame: FrameBuffer,
}

impl Default for Syn6288 {
    fn default() -> Self {
        Self::new()
    }
}

impl Syn6288 {
    /// An unlinked, uninitialized handle.
    pub fn new() -> Self {
        Self {
            serial: None,
            delay: None,
            sink: None,
            initialized: false,
            text_type: TextType::default(),
            mode: Mode::COMMON,
            baud_rate: BaudRate::default(),
            volume: 0,
            background_volume: 0,
            speed: 0,
            frame: [0u8; FRAME_BUFFER_SIZE],
        }
    }

    /// A handle with all three bindings linked.
    pub fn with_bindings(
        serial: Box<dyn SerialConnection>,
        delay: Box<dyn Delay>,
        sink: Box<dyn DiagnosticSink>,
    ) -> Self {
        let mut handle = Self::new();
        handle.link_serial(serial);
        handle.link_delay(delay);
        handle.link_diagnostics(sink);
        handle
    }

    pub fn link_serial(&mut self, serial: Box<dyn SerialConnection>) {
        self.serial = Some(serial);
    }

    pub fn link_delay(&mut self, delay: Box<dyn Delay>) {
        self.delay = Some(delay);
    }

    pub fn link_diagnostics(&mut self, sink: Box<dyn DiagnosticSink>) {
        self.sink = Some(sink);
    }

    /// Static chip and driver description
    pub fn info() -> ChipInfo {
        ChipInfo::SYN6288
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Check the bindings and open the UART.
    ///
    /// The diagnostic sink is checked first since every other failure is
    /// reported through it.
    pub fn init(&mut self) -> Syn6288Result<()> {
        let Some(sink) = self.sink.as_deref() else {
            return Err(Syn6288Error::MissingBinding("diagnostics"));
        };
        let Some(serial) = self.serial.as_deref_mut() else {
            sink.print(Level::Error, "syn6288: serial is null.");
            return Err(Syn6288Error::MissingBinding("serial"));
        };
        if self.delay.is_none() {
            sink.print(Level::Error, "syn6288: delay_ms is null.");
            return Err(Syn6288Error::MissingBinding("delay"));
        }

        serial.open().map_err(|e| {
            sink.print(Level::Error, "syn6288: uart init failed.");
            e
        })?;
        self.initialized = true;
        Ok(())
    }

    /// Close the UART and mark the handle uninitialized.
    pub fn deinit(&mut self) -> Syn6288Result<()> {
        self.ensure_initialized()?;
        if let (Some(serial), Some(sink)) = (self.serial.as_deref_mut(), self.sink.as_deref()) {
            serial.close().map_err(|e| {
                sink.print(Level::Error, "syn6288: uart deinit failed.");
                e
            })?;
        }
        self.initialized = false;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Synthesis
    // -----------------------------------------------------------------------

    /// Speak pre-encoded text (at most 200 bytes) using the current mode and
    /// text type.
    pub fn synthesis_text(&mut self, text: &[u8]) -> Syn6288Result<()> {
        let param = self.mode.bits() | self.text_type.bits();
        self.session()?.execute(&Command::Text { text, param })
    }

    pub fn synthesis_sound(&mut self, sound: Sound) -> Syn6288Result<()> {
        self.session()?.execute(&Command::Sound(sound))
    }

    pub fn synthesis_message(&mut self, message: Message) -> Syn6288Result<()> {
        self.session()?.execute(&Command::Message(message))
    }

    pub fn synthesis_ring(&mut self, ring: Ring) -> Syn6288Result<()> {
        self.session()?.execute(&Command::Ring(ring))
    }

    /// Send a raw bracket-tagged control string such as `v[6]`.
    pub fn send_command(&mut self, command: &str) -> Syn6288Result<()> {
        self.session()?.execute(&Command::Raw(command))
    }

    // -----------------------------------------------------------------------
    // Transport control
    // -----------------------------------------------------------------------

    pub fn status(&mut self) -> Syn6288Result<Status> {
        self.session()?.query_status()
    }

    pub fn stop(&mut self) -> Syn6288Result<()> {
        self.session()?.execute(&Command::Stop)
    }

    pub fn pause(&mut self) -> Syn6288Result<()> {
        self.session()?.execute(&Command::Pause)
    }

    pub fn resume(&mut self) -> Syn6288Result<()> {
        self.session()?.execute(&Command::Resume)
    }

    pub fn power_down(&mut self) -> Syn6288Result<()> {
        self.session()?.execute(&Command::PowerDown)
    }

    /// Poll every 500 ms until the chip reports idle. Never gives up on its
    /// own; use [`Syn6288::sync_timeout`] when the chip might hang.
    pub fn sync(&mut self) -> Syn6288Result<()> {
        self.poll_until_idle(None)
    }

    /// Like [`Syn6288::sync`], but fails with `Timeout` once the poll spacing
    /// alone has exceeded `limit`.
    pub fn sync_timeout(&mut self, limit: Duration) -> Syn6288Result<()> {
        self.poll_until_idle(Some(limit))
    }

    fn poll_until_idle(&mut self, limit: Option<Duration>) -> Syn6288Result<()> {
        let interval = Duration::from_millis(u64::from(SYNC_POLL_INTERVAL_MS));
        let mut waited = Duration::ZERO;
        loop {
            let mut session = self.session()?;
            session.pause(SYNC_POLL_INTERVAL_MS);
            waited += interval;
            if session.query_status()? == Status::Idle {
                return Ok(());
            }
            if let Some(limit) = limit {
                if waited >= limit {
                    return Err(Syn6288Error::Timeout(format!(
                        "chip still busy after {} ms",
                        waited.as_millis()
                    )));
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// Switch the chip's UART speed. The caller must reopen its own port at
    /// the new rate afterwards.
    pub fn set_baud_rate(&mut self, rate: BaudRate) -> Syn6288Result<()> {
        self.session()?.execute(&Command::SetBaudRate(rate))?;
        self.baud_rate = rate;
        Ok(())
    }

    pub fn baud_rate(&self) -> Syn6288Result<BaudRate> {
        self.ensure_initialized()?;
        Ok(self.baud_rate)
    }

    /// Takes effect with the next `synthesis_text`; nothing is sent.
    pub fn set_mode(&mut self, mode: Mode) -> Syn6288Result<()> {
        self.ensure_initialized()?;
        self.mode = mode;
        Ok(())
    }

    pub fn mode(&self) -> Syn6288Result<Mode> {
        self.ensure_initialized()?;
        Ok(self.mode)
    }

    /// Takes effect with the next `synthesis_text`; nothing is sent.
    pub fn set_text_type(&mut self, text_type: TextType) -> Syn6288Result<()> {
        self.ensure_initialized()?;
        self.text_type = text_type;
        Ok(())
    }

    pub fn text_type(&self) -> Syn6288Result<TextType> {
        self.ensure_initialized()?;
        Ok(self.text_type)
    }

    /// Synthesis volume, 0-16.
    pub fn set_volume(&mut self, volume: u8) -> Syn6288Result<()> {
        self.check_range("volume", volume, MAX_VOLUME)?;
        self.send_command(&format!("v[{volume}]"))?;
        self.volume = volume;
        Ok(())
    }

    pub fn volume(&self) -> Syn6288Result<u8> {
        self.ensure_initialized()?;
        Ok(self.volume)
    }

    /// Background music volume, 0-16.
    pub fn set_background_volume(&mut self, volume: u8) -> Syn6288Result<()> {
        self.check_range("background volume", volume, MAX_VOLUME)?;
        self.send_command(&format!("m[{volume}]"))?;
        self.background_volume = volume;
        Ok(())
    }

    pub fn background_volume(&self) -> Syn6288Result<u8> {
        self.ensure_initialized()?;
        Ok(self.background_volume)
    }

    /// Synthesis speed, 0-5.
    pub fn set_speed(&mut self, speed: u8) -> Syn6288Result<()> {
        self.check_range("speed", speed, MAX_SPEED)?;
        self.send_command(&format!("t[{speed}]"))?;
        self.speed = speed;
        Ok(())
    }

    pub fn speed(&self) -> Syn6288Result<u8> {
        self.ensure_initialized()?;
        Ok(self.speed)
    }

    /// Push a whole profile to an initialized chip, pausing between steps.
    pub fn configure(&mut self, config: &DriverConfig) -> Syn6288Result<()> {
        config.validate()?;
        let baud = config.baud()?;
        let mode = config.mode()?;

        self.set_baud_rate(baud)?;
        self.settle()?;
        self.set_mode(mode)?;
        self.set_text_type(config.text_type)?;
        self.set_volume(config.volume)?;
        self.settle()?;
        self.set_background_volume(config.background_volume)?;
        self.settle()?;
        self.set_speed(config.speed)?;
        self.settle()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_initialized(&self) -> Syn6288Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Syn6288Error::NotInitialized)
        }
    }

    fn check_range(&self, what: &str, value: u8, max: u8) -> Syn6288Result<()> {
        if value <= max {
            return Ok(());
        }
        let msg = format!("{what} {value} out of range 0-{max}");
        if let Some(sink) = self.sink.as_deref() {
            sink.print(Level::Warn, &format!("syn6288: {msg}."));
        }
        Err(Syn6288Error::InvalidArgument(msg))
    }

    fn settle(&mut self) -> Syn6288Result<()> {
        self.session()?.pause(CONFIGURE_STEP_DELAY_MS);
        Ok(())
    }

    /// Borrow the bindings and frame buffer for one exchange.
    fn session(&mut self) -> Syn6288Result<Session<'_>> {
        self.ensure_initialized()?;
        match (
            self.serial.as_deref_mut(),
            self.delay.as_deref_mut(),
            self.sink.as_deref(),
        ) {
            (Some(serial), Some(delay), Some(sink)) => {
                Ok(Session::new(serial, delay, sink, &mut self.frame))
            }
            // init() refuses to succeed without all three
            _ => Err(Syn6288Error::NotInitialized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSink;

    impl DiagnosticSink for NullSink {
        fn print(&self, _level: Level, _message: &str) {}
    }

    #[test]
    fn info_describes_the_chip() {
        let info = Syn6288::info();
        assert_eq!(info.chip_name, "YuToneWorld SYN6288");
        assert_eq!(info.interface, "UART");
        assert_eq!(info.max_current_ma, 280.0);
        assert_eq!(info.temperature_min, -35.0);
        assert_eq!(info.temperature_max, 85.0);
    }

    #[test]
    fn new_handle_is_uninitialized() {
        let mut handle = Syn6288::new();
        assert!(!handle.is_initialized());
        assert_eq!(handle.stop(), Err(Syn6288Error::NotInitialized));
        assert_eq!(handle.volume(), Err(Syn6288Error::NotInitialized));
    }

    #[test]
    fn init_without_sink_reports_diagnostics_binding() {
        let mut handle = Syn6288::new();
        assert_eq!(
            handle.init(),
            Err(Syn6288Error::MissingBinding("diagnostics"))
        );
    }

    #[test]
    fn init_without_serial_reports_serial_binding() {
        let mut handle = Syn6288::new();
        handle.link_diagnostics(Box::new(NullSink));
        assert_eq!(handle.init(), Err(Syn6288Error::MissingBinding("serial")));
        assert!(!handle.is_initialized());
    }

    #[test]
    fn out_of_range_speed_rejected_before_init_check() {
        let mut handle = Syn6288::new();
        assert!(matches!(
            handle.set_speed(6),
            Err(Syn6288Error::InvalidArgument(_))
        ));
        assert_eq!(handle.set_speed(5), Err(Syn6288Error::NotInitialized));
    }
}
