//! Control loop driver
//!
//! One non-preemptive loop polls every component in a fixed order:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ 1. operator console   (commands, settings)  │
//! │ 2. geiger driver      (drain serial bytes)  │
//! │ 3. time sync          (only when due)       │
//! │ 4. request server     (one connection max)  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All mutable state — the current reading, settings, sync schedule —
//! lives in the [`Appliance`] context object and is touched only from
//! this loop, so there is no locking anywhere. A restart (operator
//! save or remote `/reset`) is not performed here: it is returned as
//! [`LoopSignal::Restart`] to the process entry point, which tears the
//! appliance down and bootstraps a fresh one.

use crate::communication::httpd::{HttpServer, ServerAction, HTTP_PORT};
use crate::communication::sntp::{SntpClient, SyncState, SNTP_LOCAL_PORT};
use crate::config::Settings;
use crate::console::{Console, ConsoleEvent};
use crate::devices::geiger::GeigerDriver;
use crate::platform::{
    traits::{
        platform::{UART_CONSOLE, UART_INSTRUMENT},
        Platform, RtcInterface, UartConfig,
    },
    Result,
};
use crate::{log_error, log_info};

/// What the loop wants from its caller after an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    /// Keep looping
    Continue,
    /// Tear down and bootstrap from scratch
    Restart,
}

/// The appliance context: platform, components and shared state
///
/// Constructing one performs the whole boot sequence — load settings,
/// bring up the network with the persisted addressing mode, open the
/// peripherals. Everything is owned here; tests bootstrap over
/// [`MockPlatform`](crate::platform::mock::MockPlatform) and drive the
/// loop with synthetic bytes.
pub struct Appliance<P: Platform> {
    platform: P,
    settings: Settings,
    sync_state: SyncState,
    geiger: GeigerDriver<P::Uart>,
    console: Console<P::Uart>,
    httpd: HttpServer<P::TcpServer>,
    sntp: SntpClient<P::Udp>,
    rtc: P::Rtc,
    nvram: P::Nvram,
    timer: P::Timer,
}

impl<P: Platform> Appliance<P> {
    /// Boot the appliance on `platform`
    ///
    /// Loads persisted settings (safe defaults on fresh or corrupted
    /// storage), brings the network up with the persisted addressing
    /// mode, and opens every peripheral. The first `run_once` after
    /// boot also performs the initial time synchronization, because a
    /// fresh [`SyncState`] is immediately due.
    ///
    /// # Errors
    ///
    /// Returns an error if any peripheral cannot be opened; there is
    /// no degraded mode without a working platform.
    pub fn bootstrap(mut platform: P) -> Result<Self> {
        let mut nvram = platform.create_nvram()?;
        let settings = Settings::load_from_nvram(&mut nvram)?;

        platform.bring_up_network(settings.bring_up_address())?;

        let instrument = platform.create_uart(UART_INSTRUMENT, UartConfig::default())?;
        let console_uart = platform.create_uart(UART_CONSOLE, UartConfig::default())?;
        let tcp = platform.create_tcp_server(HTTP_PORT)?;
        let udp = platform.create_udp(SNTP_LOCAL_PORT)?;
        let rtc = platform.create_rtc()?;
        let timer = platform.create_timer()?;

        log_info!("radmon up");

        Ok(Self {
            platform,
            settings,
            sync_state: SyncState::new(),
            geiger: GeigerDriver::new(instrument),
            console: Console::new(console_uart),
            httpd: HttpServer::new(tcp),
            sntp: SntpClient::new(udp),
            rtc,
            nvram,
            timer,
        })
    }

    /// Run one loop iteration
    ///
    /// # Errors
    ///
    /// Propagates platform-level failures. [`Appliance::run`] logs and
    /// keeps looping on these; transient protocol noise never reaches
    /// this level.
    pub fn run_once(&mut self) -> Result<LoopSignal> {
        match self.console.poll(&mut self.settings)? {
            ConsoleEvent::SaveAndRestart => {
                self.settings.save_to_nvram(&mut self.nvram)?;
                log_info!("settings saved, restarting");
                return Ok(LoopSignal::Restart);
            }
            ConsoleEvent::DiscardChanges => {
                self.settings = Settings::load_from_nvram(&mut self.nvram)?;
            }
            ConsoleEvent::SettingsChanged | ConsoleEvent::None => {}
        }

        let verbose = self.settings.verbose;
        let console = &mut self.console;
        self.geiger.poll(&self.rtc, |chunk| {
            if verbose {
                console.echo(chunk);
            }
        })?;

        if self.sync_state.is_due(self.rtc.now()) {
            self.sntp.synchronize(
                self.settings.time_source(),
                &mut self.rtc,
                &mut self.timer,
                &mut self.sync_state,
            )?;
        }

        let reading = self.geiger.current_reading();
        if self.httpd.handle_one_connection(reading, &mut self.timer)?
            == ServerAction::RestartRequested
        {
            log_info!("reset requested over the network");
            return Ok(LoopSignal::Restart);
        }

        Ok(LoopSignal::Continue)
    }

    /// Run until a restart is signaled
    ///
    /// Platform errors from an iteration are logged and the loop
    /// continues; the appliance keeps limping rather than going dark.
    pub fn run(&mut self) -> LoopSignal {
        loop {
            match self.run_once() {
                Ok(LoopSignal::Continue) => {}
                Ok(LoopSignal::Restart) => return LoopSignal::Restart,
                Err(e) => {
                    log_error!("loop iteration failed: {}", e);
                }
            }
        }
    }

    /// Current in-memory settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Synchronization schedule state
    pub fn sync_state(&self) -> &SyncState {
        &self.sync_state
    }

    /// The platform this appliance runs on
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Geiger driver access (tests inject instrument bytes here)
    pub fn geiger_mut(&mut self) -> &mut GeigerDriver<P::Uart> {
        &mut self.geiger
    }

    /// Console access (tests inject operator keystrokes here)
    pub fn console_mut(&mut self) -> &mut Console<P::Uart> {
        &mut self.console
    }

    /// HTTP server access (tests inject client connections here)
    pub fn httpd_mut(&mut self) -> &mut HttpServer<P::TcpServer> {
        &mut self.httpd
    }

    /// SNTP client access (tests script time-source replies here)
    pub fn sntp_mut(&mut self) -> &mut SntpClient<P::Udp> {
        &mut self.sntp
    }

    /// RTC access
    pub fn rtc_mut(&mut self) -> &mut P::Rtc {
        &mut self.rtc
    }

    /// NVRAM access
    pub fn nvram_mut(&mut self) -> &mut P::Nvram {
        &mut self.nvram
    }
}
