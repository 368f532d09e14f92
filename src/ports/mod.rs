//! Port traits (interfaces)
//!
//! These traits define the boundaries between the driver core and the board
//! it runs on. Adapters implement them for real hardware; tests implement
//! them with in-memory fakes.

pub mod delay;
pub mod diagnostic;
pub mod serial;

pub use delay::*;
pub use diagnostic::*;
pub use serial::*;
