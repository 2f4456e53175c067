//! Mock platform for testing
//!
//! In-memory implementations of every peripheral trait, with injection
//! helpers (`inject_rx_data`, `inject_client`, `inject_datagram`) so
//! unit and integration tests can script the outside world without
//! hardware or sockets.

pub mod net;
pub mod nvram;
pub mod platform;
pub mod rtc;
pub mod timer;
pub mod uart;

pub use net::{MockTcpServer, MockUdp};
pub use nvram::MockNvram;
pub use platform::MockPlatform;
pub use rtc::MockRtc;
pub use timer::MockTimer;
pub use uart::MockUart;
