//! Root platform trait
//!
//! This module defines the root Platform trait that aggregates all
//! peripheral interfaces the appliance needs.

use super::{
    NvramInterface, RtcInterface, TcpServerInterface, TimerInterface, UartConfig, UartInterface,
    UdpInterface,
};
use crate::platform::Result;

/// UART identifier for the counting instrument's serial feed
pub const UART_INSTRUMENT: u8 = 0;

/// UART identifier for the operator console
pub const UART_CONSOLE: u8 = 1;

/// Root platform trait
///
/// Aggregates the peripheral interfaces via associated types, so
/// component code is generic and monomorphizes against whichever
/// platform (mock, host simulation, future MCU port) it runs on.
///
/// # Example
///
/// ```ignore
/// let mut platform = SimPlatform::init()?;
/// platform.bring_up_network(None)?; // DHCP
/// let instrument = platform.create_uart(UART_INSTRUMENT, UartConfig::default())?;
/// let tcp = platform.create_tcp_server(80)?;
/// ```
pub trait Platform: Sized {
    /// UART peripheral type
    type Uart: UartInterface;

    /// Real-time clock type
    type Rtc: RtcInterface;

    /// Non-volatile settings storage type
    type Nvram: NvramInterface;

    /// TCP server socket type
    type TcpServer: TcpServerInterface;

    /// UDP socket type
    type Udp: UdpInterface;

    /// Timer peripheral type
    type Timer: TimerInterface;

    /// Initialize the platform
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InitializationFailed` if initialization
    /// fails.
    fn init() -> Result<Self>;

    /// Create a UART peripheral instance
    ///
    /// # Arguments
    ///
    /// * `uart_id` - [`UART_INSTRUMENT`] or [`UART_CONSOLE`]
    /// * `config` - UART configuration
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the UART is
    /// already claimed or the identifier is unknown.
    fn create_uart(&mut self, uart_id: u8, config: UartConfig) -> Result<Self::Uart>;

    /// Create the real-time clock instance
    fn create_rtc(&mut self) -> Result<Self::Rtc>;

    /// Create the settings storage instance
    fn create_nvram(&mut self) -> Result<Self::Nvram>;

    /// Bring up the network interface
    ///
    /// `static_ip` of `None` requests dynamic (DHCP) addressing.
    /// Called once at boot with the persisted addressing mode; an
    /// address changed at runtime takes effect only after the restart
    /// that calls this again.
    fn bring_up_network(&mut self, static_ip: Option<[u8; 4]>) -> Result<()>;

    /// Create the TCP server socket listening on `port`
    fn create_tcp_server(&mut self, port: u16) -> Result<Self::TcpServer>;

    /// Create a UDP socket bound to `port`
    fn create_udp(&mut self, port: u16) -> Result<Self::Udp>;

    /// Create the timer instance
    fn create_timer(&mut self) -> Result<Self::Timer>;
}
