//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the appliance's
//! peripherals: serial ports, wall clock, settings NVRAM, network
//! sockets and timers. All platform-specific code lives below this
//! module; everything above it is generic over the traits.

pub mod error;
pub mod traits;

// Platform implementations
#[cfg(feature = "sim")]
pub mod sim;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{
    NvramInterface, Platform, RtcInterface, TcpServerInterface, TimerInterface, UartInterface,
    UdpInterface,
};
