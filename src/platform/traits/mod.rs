//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod net;
pub mod nvram;
pub mod platform;
pub mod rtc;
pub mod timer;
pub mod uart;

// Re-export trait interfaces
pub use net::{TcpServerInterface, UdpInterface};
pub use nvram::NvramInterface;
pub use platform::Platform;
pub use rtc::RtcInterface;
pub use timer::TimerInterface;
pub use uart::{UartConfig, UartInterface, UartParity, UartStopBits};
