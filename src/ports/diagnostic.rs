//! Diagnostic output port

/// Sink for the driver core's diagnostic messages.
///
/// The core never writes to a logger directly; everything it reports
/// (transport failures, NAKs, frame traces) goes through this trait.
pub trait DiagnosticSink: Send {
    fn print(&self, level: log::Level, message: &str);
}
