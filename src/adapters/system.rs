//! Host implementations of the delay and diagnostic ports.

use std::time::Duration;

use log::Level;

use crate::ports::{Delay, DiagnosticSink};

/// Blocks the calling thread with `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Forwards driver diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    target: &'static str,
}

impl LogSink {
    pub const TARGET: &'static str = "syn6288";

    pub fn new() -> Self {
        Self {
            target: Self::TARGET,
        }
    }

    /// Log under a custom target, e.g. one per device when driving several chips
    pub fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for LogSink {
    fn print(&self, level: Level, message: &str) {
        log::log!(target: self.target, level, "{message}");
    }
}
