//! Simulation platform implementation

use super::{SimError, SimNvram, SimRtc, SimTcpServer, SimTimer, SimUart, SimUdp};
use crate::log_info;
use crate::platform::{
    traits::{
        platform::{UART_CONSOLE, UART_INSTRUMENT},
        Platform, UartConfig,
    },
    PlatformError, Result,
};
use std::path::PathBuf;
use std::string::String;

/// Default instrument bridge port
const DEFAULT_INSTRUMENT_PORT: u16 = 7001;

/// Default console bridge port
const DEFAULT_CONSOLE_PORT: u16 = 7002;

/// Default HTTP port (the appliance asks for 80; binding that needs
/// privileges a simulation should not have)
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default NVRAM backing file
const DEFAULT_NVRAM_FILE: &str = "radmon.nvram";

/// Simulation platform configuration, resolved from the environment
#[derive(Debug, Clone)]
struct SimConfig {
    instrument_port: u16,
    console_port: u16,
    http_port: u16,
    nvram_path: PathBuf,
}

impl SimConfig {
    fn from_env() -> core::result::Result<Self, SimError> {
        Ok(Self {
            instrument_port: env_port("RADMON_INSTRUMENT_PORT", DEFAULT_INSTRUMENT_PORT)?,
            console_port: env_port("RADMON_CONSOLE_PORT", DEFAULT_CONSOLE_PORT)?,
            http_port: env_port("RADMON_HTTP_PORT", DEFAULT_HTTP_PORT)?,
            nvram_path: std::env::var("RADMON_NVRAM")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_NVRAM_FILE)),
        })
    }
}

fn env_port(var: &'static str, default: u16) -> core::result::Result<u16, SimError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| SimError::InvalidPort(var, String::from(value.as_str()))),
        Err(_) => Ok(default),
    }
}

/// Host simulation platform
///
/// See the [module docs](super) for the environment variables that
/// select bridge ports and the NVRAM file.
pub struct SimPlatform {
    config: SimConfig,
}

impl SimPlatform {
    fn sim_err(e: SimError) -> PlatformError {
        let msg = e.to_string();
        log_info!("sim platform setup failed: {}", msg.as_str());
        PlatformError::InitializationFailed
    }
}

impl Platform for SimPlatform {
    type Uart = SimUart;
    type Rtc = SimRtc;
    type Nvram = SimNvram;
    type TcpServer = SimTcpServer;
    type Udp = SimUdp;
    type Timer = SimTimer;

    fn init() -> Result<Self> {
        let config = SimConfig::from_env().map_err(Self::sim_err)?;
        Ok(Self { config })
    }

    fn create_uart(&mut self, uart_id: u8, config: UartConfig) -> Result<Self::Uart> {
        let port = match uart_id {
            UART_INSTRUMENT => self.config.instrument_port,
            UART_CONSOLE => self.config.console_port,
            _ => return Err(PlatformError::ResourceUnavailable),
        };
        let uart = SimUart::bind(port, config).map_err(Self::sim_err)?;
        log_info!("serial bridge listening on 127.0.0.1:{}", port);
        Ok(uart)
    }

    fn create_rtc(&mut self) -> Result<Self::Rtc> {
        Ok(SimRtc::new())
    }

    fn create_nvram(&mut self) -> Result<Self::Nvram> {
        Ok(SimNvram::open(self.config.nvram_path.clone()))
    }

    fn bring_up_network(&mut self, static_ip: Option<[u8; 4]>) -> Result<()> {
        // The host OS owns addressing; the persisted mode is only
        // reported so a sim session behaves observably like the device.
        match static_ip {
            Some(ip) => log_info!(
                "network up (static {}.{}.{}.{} requested, host-managed)",
                ip[0],
                ip[1],
                ip[2],
                ip[3]
            ),
            None => log_info!("network up (DHCP, host-managed)"),
        }
        Ok(())
    }

    fn create_tcp_server(&mut self, _port: u16) -> Result<Self::TcpServer> {
        let server = SimTcpServer::bind(self.config.http_port).map_err(Self::sim_err)?;
        log_info!("http interface on 0.0.0.0:{}", self.config.http_port);
        Ok(server)
    }

    fn create_udp(&mut self, port: u16) -> Result<Self::Udp> {
        SimUdp::bind(port).map_err(Self::sim_err)
    }

    fn create_timer(&mut self) -> Result<Self::Timer> {
        Ok(SimTimer::new())
    }
}
