//! UART interface trait
//!
//! Serial ports carry the two byte streams the appliance lives on: the
//! telemetry feed from the counting instrument and the operator console.

use crate::platform::Result;

/// UART parity setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartParity {
    /// No parity bit
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// UART stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartStopBits {
    /// One stop bit
    One,
    /// Two stop bits
    Two,
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// Data bits per frame (5-8)
    pub data_bits: u8,
    /// Parity setting
    pub parity: UartParity,
    /// Stop bits
    pub stop_bits: UartStopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: 8,
            parity: UartParity::None,
            stop_bits: UartStopBits::One,
        }
    }
}

/// UART peripheral interface
///
/// Reads are non-blocking: `read` returns however many bytes are
/// currently buffered, possibly zero. The control loop polls rather
/// than waits.
pub trait UartInterface {
    /// Write bytes, returning the number actually queued for transmit
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read buffered bytes into `buffer`, returning the count (0 if none)
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Change the baud rate
    fn set_baud_rate(&mut self, baud: u32) -> Result<()>;

    /// Check whether received bytes are waiting
    fn available(&self) -> bool;

    /// Block until queued transmit data has drained
    fn flush(&mut self) -> Result<()>;
}
