//! Operator console
//!
//! A single-character menu on the console serial port for the handful
//! of things an operator can change in the field: addressing, time
//! source, verbose echo, and committing those to NVRAM. Polled from
//! the control loop; line entry (addresses, host names) accumulates
//! across polls so the console never blocks the loop.
//!
//! Edits apply to the in-memory [`Settings`] immediately. Nothing is
//! persisted until `s` (save and restart); `x` discards uncommitted
//! edits by asking the loop to reload the persisted snapshot.

use crate::config::settings::{parse_ipv4, Settings, DEFAULT_TIME_SOURCE};
use crate::platform::{traits::UartInterface, Result};
use core::fmt::Write as _;
use heapless::{String, Vec};

/// Line-entry buffer size (dotted quad or host name plus slack)
const ENTRY_BUF: usize = 48;

/// Menu and help text
const MENU: &str = "\r\n\
radmon setup\r\n\
  v  view settings\r\n\
  i  set IP address (blank = DHCP)\r\n\
  t  set time server (blank = default)\r\n\
  e  toggle verbose echo\r\n\
  x  exit, discard unsaved changes\r\n\
  s  save settings and restart\r\n";

/// What a console poll asked of the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// Nothing actionable
    None,
    /// In-memory settings were modified
    SettingsChanged,
    /// Reload persisted settings, dropping uncommitted edits
    DiscardChanges,
    /// Persist settings and restart the appliance
    SaveAndRestart,
}

/// Input interpretation state
enum InputMode {
    /// Single-character commands
    Menu,
    /// Accumulating an IP address line
    Address,
    /// Accumulating a time-source line
    TimeSourceEntry,
}

/// Operator console over the console UART
pub struct Console<U: UartInterface> {
    uart: U,
    mode: InputMode,
    line: Vec<u8, ENTRY_BUF>,
}

impl<U: UartInterface> Console<U> {
    /// Create a console over `uart`
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            mode: InputMode::Menu,
            line: Vec::new(),
        }
    }

    /// Get mutable reference to the UART (for the loop's verbose echo
    /// and for tests)
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Write raw bytes to the console (verbose instrument echo)
    pub fn echo(&mut self, data: &[u8]) {
        let _ = self.uart.write(data);
    }

    /// Process any pending operator input
    ///
    /// Consumes every buffered byte, mutating `settings` in place as
    /// commands complete. Returns the first loop-significant event;
    /// bytes after it stay buffered for the next poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the UART fails.
    pub fn poll(&mut self, settings: &mut Settings) -> Result<ConsoleEvent> {
        let mut byte = [0u8; 1];
        loop {
            if self.uart.read(&mut byte)? == 0 {
                return Ok(ConsoleEvent::None);
            }
            let event = match self.mode {
                InputMode::Menu => self.menu_command(byte[0], settings)?,
                InputMode::Address | InputMode::TimeSourceEntry => {
                    self.entry_byte(byte[0], settings)?
                }
            };
            match event {
                ConsoleEvent::None => continue,
                significant => return Ok(significant),
            }
        }
    }

    /// Handle one menu-mode command character
    fn menu_command(&mut self, byte: u8, settings: &mut Settings) -> Result<ConsoleEvent> {
        match byte.to_ascii_lowercase() {
            b'\r' | b'\n' => Ok(ConsoleEvent::None),
            b'v' => {
                self.print_settings(settings)?;
                Ok(ConsoleEvent::None)
            }
            b'i' => {
                self.write_str("\r\nIP address (blank = DHCP): ")?;
                self.line.clear();
                self.mode = InputMode::Address;
                Ok(ConsoleEvent::None)
            }
            b't' => {
                self.write_str("\r\ntime server (blank = default): ")?;
                self.line.clear();
                self.mode = InputMode::TimeSourceEntry;
                Ok(ConsoleEvent::None)
            }
            b'e' => {
                settings.verbose = !settings.verbose;
                self.write_str(if settings.verbose {
                    "\r\nverbose echo on\r\n"
                } else {
                    "\r\nverbose echo off\r\n"
                })?;
                Ok(ConsoleEvent::SettingsChanged)
            }
            b'x' => {
                self.write_str("\r\nexiting setup, unsaved changes discarded\r\n")?;
                Ok(ConsoleEvent::DiscardChanges)
            }
            b's' => {
                self.write_str("\r\nsaving settings, restarting\r\n")?;
                Ok(ConsoleEvent::SaveAndRestart)
            }
            _ => {
                self.write_str(MENU)?;
                Ok(ConsoleEvent::None)
            }
        }
    }

    /// Handle one byte of line entry
    fn entry_byte(&mut self, byte: u8, settings: &mut Settings) -> Result<ConsoleEvent> {
        if byte == b'\r' {
            return Ok(ConsoleEvent::None);
        }
        if byte != b'\n' {
            // Echo the keystroke; overlong entry truncates silently.
            let _ = self.uart.write(&[byte]);
            self.line.push(byte).ok();
            return Ok(ConsoleEvent::None);
        }

        self.write_str("\r\n")?;
        let entered = core::str::from_utf8(&self.line).unwrap_or("");
        let event = match self.mode {
            InputMode::Address => {
                if entered.is_empty() {
                    settings.use_dhcp = true;
                    self.write_str("using DHCP\r\n")?;
                    ConsoleEvent::SettingsChanged
                } else if let Some(addr) = parse_ipv4(entered) {
                    settings.use_dhcp = false;
                    settings.static_ip = addr;
                    self.write_str("static address set (takes effect after restart)\r\n")?;
                    ConsoleEvent::SettingsChanged
                } else {
                    self.write_str("invalid address, not changed\r\n")?;
                    ConsoleEvent::None
                }
            }
            InputMode::TimeSourceEntry => {
                settings.set_time_source(entered);
                if entered.is_empty() {
                    self.write_str("using default time server\r\n")?;
                } else {
                    self.write_str("time server set\r\n")?;
                }
                ConsoleEvent::SettingsChanged
            }
            InputMode::Menu => ConsoleEvent::None,
        };

        self.line.clear();
        self.mode = InputMode::Menu;
        Ok(event)
    }

    /// Print the current settings
    fn print_settings(&mut self, settings: &Settings) -> Result<()> {
        let mut out: String<192> = String::new();

        let _ = out.push_str("\r\nnetwork:     ");
        if settings.use_dhcp {
            let _ = out.push_str("DHCP");
        } else {
            let ip = settings.static_ip;
            let _ = write!(out, "static {}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]);
        }

        let _ = out.push_str("\r\ntime source: ");
        if settings.time_source.is_empty() {
            let _ = write!(out, "{} (default)", DEFAULT_TIME_SOURCE);
        } else {
            let _ = out.push_str(settings.time_source.as_str());
        }

        let _ = out.push_str("\r\nverbose:     ");
        let _ = out.push_str(if settings.verbose { "on" } else { "off" });
        let _ = out.push_str("\r\n");

        self.write_str(&out)
    }

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.uart.write(s.as_bytes())?;
        Ok(())
    }
}
