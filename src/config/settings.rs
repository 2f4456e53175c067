//! Settings storage
//!
//! Persistent operator settings with a fixed-offset NVRAM layout.
//!
//! # NVRAM Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Addressing mode: u8 (0 = DHCP, else static)  │  Offset: 0
//! ├──────────────────────────────────────────────┤
//! │ Static address: [u8; 4]                      │  Offset: 1
//! ├──────────────────────────────────────────────┤
//! │ Verbose echo: u8 (zero/non-zero)             │  Offset: 5
//! ├──────────────────────────────────────────────┤
//! │ Time source: up to 32 bytes, NUL terminated  │  Offset: 6
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The layout is deliberately unvalidated: flag bytes are read with a
//! zero/non-zero test and the string is truncated at its bound on both
//! save and load. All-zero (never-programmed) storage decodes to the
//! defaults — dynamic addressing, verbose off, the well-known default
//! time source — by construction, so first boot and corrupted storage
//! both come up safe rather than failing.

use crate::platform::{traits::NvramInterface, Result};
use heapless::String;

/// Maximum time-source identifier length (dotted quad or host name)
pub const TIME_SOURCE_MAX_LEN: usize = 32;

/// Time source used when none is configured
pub const DEFAULT_TIME_SOURCE: &str = "pool.ntp.org";

/// Addressing-mode byte offset
const OFF_MODE: u16 = 0;
/// Static address octets offset
const OFF_ADDR: u16 = 1;
/// Verbose-echo byte offset
const OFF_VERBOSE: u16 = 5;
/// Time-source string offset
const OFF_SOURCE: u16 = 6;

/// Total persisted length: header bytes + string + NUL terminator
const SETTINGS_LEN: usize = OFF_SOURCE as usize + TIME_SOURCE_MAX_LEN + 1;

/// Configured time source, as the sync client consumes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource<'a> {
    /// Dotted-quad address, used directly
    Address([u8; 4]),
    /// Host name, resolved at sync time
    Hostname(&'a str),
}

/// Operator-configurable appliance settings
///
/// The in-memory copy is authoritative for the running appliance;
/// NVRAM is only touched by [`Settings::load_from_nvram`] at boot and
/// [`Settings::save_to_nvram`] on an explicit console save. The two
/// may diverge until then — a changed address only reaches the network
/// interface at the restart that re-runs bring-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Use DHCP for address assignment
    pub use_dhcp: bool,
    /// Static address (meaningful only when `use_dhcp` is false)
    pub static_ip: [u8; 4],
    /// Echo raw instrument bytes to the console
    pub verbose: bool,
    /// Time-source identifier; empty means [`DEFAULT_TIME_SOURCE`]
    pub time_source: String<TIME_SOURCE_MAX_LEN>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_dhcp: true,
            static_ip: [0, 0, 0, 0],
            verbose: false,
            time_source: String::new(),
        }
    }
}

impl Settings {
    /// Load settings from NVRAM
    ///
    /// Never fails on garbage contents: flag bytes decode zero/non-zero
    /// and an undecodable time-source string falls back to the default.
    ///
    /// # Errors
    ///
    /// Only if the storage itself cannot be read.
    pub fn load_from_nvram<N: NvramInterface>(nvram: &mut N) -> Result<Self> {
        let mut buf = [0u8; SETTINGS_LEN];
        nvram.read(0, &mut buf)?;

        let use_dhcp = buf[OFF_MODE as usize] == 0;
        let static_ip = [
            buf[OFF_ADDR as usize],
            buf[OFF_ADDR as usize + 1],
            buf[OFF_ADDR as usize + 2],
            buf[OFF_ADDR as usize + 3],
        ];
        let verbose = buf[OFF_VERBOSE as usize] != 0;

        let source_bytes = &buf[OFF_SOURCE as usize..OFF_SOURCE as usize + TIME_SOURCE_MAX_LEN];
        let len = source_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TIME_SOURCE_MAX_LEN);
        let mut time_source = String::new();
        if let Ok(s) = core::str::from_utf8(&source_bytes[..len]) {
            // Bounded by construction; push cannot fail.
            time_source.push_str(s).ok();
        }

        Ok(Self {
            use_dhcp,
            static_ip,
            verbose,
            time_source,
        })
    }

    /// Save settings to NVRAM
    ///
    /// Writes the full fixed layout in one pass. The time-source string
    /// is truncated at [`TIME_SOURCE_MAX_LEN`] (already enforced by the
    /// field type) and NUL terminated.
    pub fn save_to_nvram<N: NvramInterface>(&self, nvram: &mut N) -> Result<()> {
        let mut buf = [0u8; SETTINGS_LEN];

        buf[OFF_MODE as usize] = if self.use_dhcp { 0 } else { 1 };
        buf[OFF_ADDR as usize..OFF_ADDR as usize + 4].copy_from_slice(&self.static_ip);
        buf[OFF_VERBOSE as usize] = if self.verbose { 1 } else { 0 };

        let source = self.time_source.as_bytes();
        buf[OFF_SOURCE as usize..OFF_SOURCE as usize + source.len()].copy_from_slice(source);
        // Remaining bytes are already zero, which covers the terminator.

        nvram.write(0, &buf)
    }

    /// Static address to apply at network bring-up (`None` = DHCP)
    pub fn bring_up_address(&self) -> Option<[u8; 4]> {
        if self.use_dhcp {
            None
        } else {
            Some(self.static_ip)
        }
    }

    /// The time source the sync client should use
    ///
    /// An empty identifier yields the default source; a dotted quad is
    /// returned as an address, anything else as a host name.
    pub fn time_source(&self) -> TimeSource<'_> {
        let name = if self.time_source.is_empty() {
            DEFAULT_TIME_SOURCE
        } else {
            self.time_source.as_str()
        };
        match parse_ipv4(name) {
            Some(addr) => TimeSource::Address(addr),
            None => TimeSource::Hostname(name),
        }
    }

    /// Replace the time-source identifier, truncating at the bound
    pub fn set_time_source(&mut self, source: &str) {
        self.time_source.clear();
        let mut end = source.len().min(TIME_SOURCE_MAX_LEN);
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        self.time_source.push_str(&source[..end]).ok();
    }
}

/// Parse a dotted-quad IPv4 address
///
/// Returns `None` for anything that is not exactly four dot-separated
/// decimal octets in range.
pub fn parse_ipv4(s: &str) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut count = 0;

    for part in s.split('.') {
        if count == 4 || part.is_empty() || part.len() > 3 {
            return None;
        }
        let mut value: u16 = 0;
        for c in part.bytes() {
            if !c.is_ascii_digit() {
                return None;
            }
            value = value * 10 + (c - b'0') as u16;
        }
        if value > 255 {
            return None;
        }
        octets[count] = value as u8;
        count += 1;
    }

    if count == 4 {
        Some(octets)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockNvram;

    #[test]
    fn test_fresh_storage_decodes_to_defaults() {
        let mut nvram = MockNvram::new();
        let settings = Settings::load_from_nvram(&mut nvram).unwrap();

        assert_eq!(settings, Settings::default());
        assert!(settings.use_dhcp);
        assert!(!settings.verbose);
        assert_eq!(
            settings.time_source(),
            TimeSource::Hostname(DEFAULT_TIME_SOURCE)
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut nvram = MockNvram::new();

        let mut settings = Settings::default();
        settings.use_dhcp = false;
        settings.static_ip = [192, 168, 1, 50];
        settings.verbose = true;
        settings.set_time_source("time.nist.gov");

        settings.save_to_nvram(&mut nvram).unwrap();
        let loaded = Settings::load_from_nvram(&mut nvram).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_round_trip_max_length_source() {
        let mut nvram = MockNvram::new();

        let mut settings = Settings::default();
        settings.set_time_source("a-very-long-time-server-name.net"); // exactly 32
        assert_eq!(settings.time_source.len(), TIME_SOURCE_MAX_LEN);

        settings.save_to_nvram(&mut nvram).unwrap();
        let loaded = Settings::load_from_nvram(&mut nvram).unwrap();
        assert_eq!(loaded.time_source, settings.time_source);
    }

    #[test]
    fn test_overlong_source_truncates() {
        let mut settings = Settings::default();
        settings.set_time_source("this-name-is-much-longer-than-the-bound-allows.example.org");
        assert_eq!(settings.time_source.len(), TIME_SOURCE_MAX_LEN);
    }

    #[test]
    fn test_corrupted_flags_decode_zero_nonzero() {
        let mut nvram = MockNvram::new();
        nvram.inject_corruption(0, 6);

        let settings = Settings::load_from_nvram(&mut nvram).unwrap();
        // 0xA5 mode byte reads as static addressing, 0xA5 verbose as on.
        assert!(!settings.use_dhcp);
        assert!(settings.verbose);
        assert_eq!(settings.static_ip, [0xA5; 4]);
    }

    #[test]
    fn test_corrupted_source_falls_back_to_default() {
        let mut nvram = MockNvram::new();
        // 0xA5 repeated is not valid UTF-8, so the string decodes empty.
        nvram.inject_corruption(0, 40);

        let settings = Settings::load_from_nvram(&mut nvram).unwrap();
        assert!(settings.time_source.is_empty());
        assert_eq!(
            settings.time_source(),
            TimeSource::Hostname(DEFAULT_TIME_SOURCE)
        );
    }

    #[test]
    fn test_dotted_quad_source_parses_as_address() {
        let mut settings = Settings::default();
        settings.set_time_source("129.6.15.28");
        assert_eq!(settings.time_source(), TimeSource::Address([129, 6, 15, 28]));
    }

    #[test]
    fn test_parse_ipv4() {
        assert_eq!(parse_ipv4("10.0.0.1"), Some([10, 0, 0, 1]));
        assert_eq!(parse_ipv4("255.255.255.255"), Some([255, 255, 255, 255]));
        assert_eq!(parse_ipv4("256.0.0.1"), None);
        assert_eq!(parse_ipv4("10.0.0"), None);
        assert_eq!(parse_ipv4("10.0.0.1.2"), None);
        assert_eq!(parse_ipv4("pool.ntp.org"), None);
        assert_eq!(parse_ipv4(""), None);
    }
}
