//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL- or OS-specific errors to
/// these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// UART operation failed
    Uart(UartError),
    /// Network operation failed
    Net(NetError),
    /// Non-volatile storage operation failed
    Nvram(NvramError),
    /// Real-time clock operation failed
    Rtc(RtcError),
    /// Timer operation failed
    Timer(TimerError),
    /// Platform initialization failed
    InitializationFailed,
    /// Invalid configuration provided
    InvalidConfig,
    /// Resource not available
    ResourceUnavailable,
}

/// UART-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Write operation failed
    WriteFailed,
    /// Read operation failed
    ReadFailed,
    /// Invalid baud rate
    InvalidBaudRate,
    /// Framing error
    FramingError,
    /// Overrun error
    Overrun,
}

/// Network-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetError {
    /// Interface bring-up failed
    LinkDown,
    /// Socket could not be opened or bound
    BindFailed,
    /// Send operation failed
    SendFailed,
    /// Receive operation failed
    ReceiveFailed,
    /// Host name could not be resolved
    ResolveFailed,
    /// Connection closed by the peer
    ConnectionClosed,
}

/// Non-volatile storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvramError {
    /// Offset or length outside the storage range
    OutOfRange,
    /// Write operation failed
    WriteFailed,
    /// Read operation failed
    ReadFailed,
}

/// Real-time clock errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// Clock hardware rejected the value
    SetFailed,
}

/// Timer-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Timer overflow
    Overflow,
    /// Invalid duration
    InvalidDuration,
}

impl From<UartError> for PlatformError {
    fn from(e: UartError) -> Self {
        PlatformError::Uart(e)
    }
}

impl From<NetError> for PlatformError {
    fn from(e: NetError) -> Self {
        PlatformError::Net(e)
    }
}

impl From<NvramError> for PlatformError {
    fn from(e: NvramError) -> Self {
        PlatformError::Nvram(e)
    }
}

impl From<RtcError> for PlatformError {
    fn from(e: RtcError) -> Self {
        PlatformError::Rtc(e)
    }
}

impl From<TimerError> for PlatformError {
    fn from(e: TimerError) -> Self {
        PlatformError::Timer(e)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Uart(e) => write!(f, "UART error: {:?}", e),
            PlatformError::Net(e) => write!(f, "network error: {:?}", e),
            PlatformError::Nvram(e) => write!(f, "NVRAM error: {:?}", e),
            PlatformError::Rtc(e) => write!(f, "RTC error: {:?}", e),
            PlatformError::Timer(e) => write!(f, "timer error: {:?}", e),
            PlatformError::InitializationFailed => write!(f, "platform initialization failed"),
            PlatformError::InvalidConfig => write!(f, "invalid configuration"),
            PlatformError::ResourceUnavailable => write!(f, "resource not available"),
        }
    }
}
