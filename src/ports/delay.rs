//! Blocking delay port

/// Blocking millisecond delay used for the chip's settle and poll timing.
///
/// Injected rather than calling `std::thread::sleep` directly so tests can
/// record the requested timing without waiting for it.
pub trait Delay: Send {
    fn delay_ms(&mut self, ms: u32);
}
