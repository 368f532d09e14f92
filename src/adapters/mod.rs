//! Adapters: implementations of the ports for real hosts, plus a simulated
//! chip and profile file persistence.

pub mod config_file;
pub mod mock_device;
pub mod serial_port;
pub mod system;

pub use config_file::{load_config, save_config};
pub use mock_device::MockSyn6288;
pub use serial_port::{SerialPortConnection, SerialPortFactory};
pub use system::{LogSink, ThreadDelay};
