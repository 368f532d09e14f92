//! Core domain types
//!
//! Pure types with no I/O dependencies. These describe the chip's settings,
//! its canned audio selectors and the driver's error taxonomy.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
