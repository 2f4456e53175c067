//! Mock platform implementation

use super::{MockNvram, MockRtc, MockTcpServer, MockTimer, MockUart, MockUdp};
use crate::platform::{
    traits::{Platform, UartConfig},
    Result,
};
use std::vec::Vec;

/// Mock platform for testing
///
/// Hands out mock peripherals and records network bring-up requests so
/// tests can assert the addressing mode actually applied at boot.
/// NVRAM contents can be seeded before the appliance bootstraps:
///
/// ```
/// use radmon::platform::mock::MockPlatform;
/// use radmon::platform::traits::Platform;
///
/// let mut platform = MockPlatform::init().unwrap();
/// platform.preload_nvram(&[0x01, 192, 168, 1, 50, 0x00]);
/// let _nvram = platform.create_nvram().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockPlatform {
    nvram_image: Vec<u8>,
    rtc_epoch: u32,
    /// Bring-up requests, newest last (`None` = DHCP)
    network_requests: Vec<Option<[u8; 4]>>,
}

impl MockPlatform {
    /// Seed the NVRAM image handed to the next `create_nvram` call
    pub fn preload_nvram(&mut self, contents: &[u8]) {
        self.nvram_image = contents.to_vec();
    }

    /// Seed the RTC handed to the next `create_rtc` call
    pub fn preset_rtc(&mut self, epoch: u32) {
        self.rtc_epoch = epoch;
    }

    /// Network bring-up requests seen so far (`None` = DHCP)
    pub fn network_requests(&self) -> &[Option<[u8; 4]>] {
        &self.network_requests
    }
}

impl Platform for MockPlatform {
    type Uart = MockUart;
    type Rtc = MockRtc;
    type Nvram = MockNvram;
    type TcpServer = MockTcpServer;
    type Udp = MockUdp;
    type Timer = MockTimer;

    fn init() -> Result<Self> {
        Ok(Self::default())
    }

    fn create_uart(&mut self, _uart_id: u8, config: UartConfig) -> Result<Self::Uart> {
        Ok(MockUart::new(config))
    }

    fn create_rtc(&mut self) -> Result<Self::Rtc> {
        Ok(MockRtc::at(self.rtc_epoch))
    }

    fn create_nvram(&mut self) -> Result<Self::Nvram> {
        Ok(if self.nvram_image.is_empty() {
            MockNvram::new()
        } else {
            MockNvram::with_contents(&self.nvram_image)
        })
    }

    fn bring_up_network(&mut self, static_ip: Option<[u8; 4]>) -> Result<()> {
        self.network_requests.push(static_ip);
        Ok(())
    }

    fn create_tcp_server(&mut self, _port: u16) -> Result<Self::TcpServer> {
        Ok(MockTcpServer::new())
    }

    fn create_udp(&mut self, _port: u16) -> Result<Self::Udp> {
        Ok(MockUdp::new())
    }

    fn create_timer(&mut self) -> Result<Self::Timer> {
        Ok(MockTimer::new())
    }
}
