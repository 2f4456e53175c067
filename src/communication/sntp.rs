//! SNTP time synchronization client
//!
//! Readings are only as good as their timestamps, so the appliance
//! periodically asks a network time source for the current time and
//! steps the RTC to match. The exchange is a single fixed-format
//! datagram each way: a 48-byte client request, and a reply carrying
//! seconds-since-1900 at a fixed byte offset.
//!
//! Failure policy: a bounded number of attempts per cycle, each with a
//! bounded reply wait. When every attempt times out the clock is left
//! alone and the next cycle is scheduled at the normal periodic
//! interval — an unreachable time source must not turn into a tight
//! retry loop on the network. Stepping the clock can make consecutive
//! reading timestamps jump; that is accepted, not smoothed.

use crate::config::TimeSource;
use crate::platform::{
    traits::{TimerInterface, UdpInterface},
    Result, RtcInterface,
};
use crate::{log_debug, log_info, log_warn};

/// SNTP server port
pub const SNTP_PORT: u16 = 123;

/// Local UDP port for the exchange
pub const SNTP_LOCAL_PORT: u16 = 8888;

/// Seconds between scheduled synchronizations (twice daily)
pub const SYNC_INTERVAL_SECS: u32 = 43_200;

/// Attempts per synchronization cycle
pub const MAX_ATTEMPTS: u8 = 3;

/// SNTP packet size
const PACKET_SIZE: usize = 48;

/// Request header byte: LI = 0, version = 3, mode = 3 (client)
const REQUEST_HEADER: u8 = 0x1B;

/// Byte offset of the transmit timestamp's seconds word in the reply
const TRANSMIT_TS_OFFSET: usize = 40;

/// Offset between the NTP epoch (1900) and the Unix epoch (1970)
const SECONDS_1900_TO_1970: u32 = 2_208_988_800;

/// Per-attempt reply wait
const REPLY_TIMEOUT_MS: u32 = 2_000;

/// Poll step while waiting for a reply
const POLL_STEP_MS: u32 = 10;

/// Delay between attempts
const RETRY_DELAY_MS: u32 = 500;

/// Synchronization bookkeeping
///
/// Tracks when the next cycle is due and how many attempts remain in
/// the cycle currently in flight. Reset whenever a cycle completes,
/// successfully or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncState {
    next_due: u32,
    attempts_left: u8,
}

impl SyncState {
    /// Create state that is due immediately (boot-time sync)
    pub fn new() -> Self {
        Self {
            next_due: 0,
            attempts_left: MAX_ATTEMPTS,
        }
    }

    /// True when a synchronization cycle should run
    pub fn is_due(&self, now: u32) -> bool {
        now >= self.next_due
    }

    /// Epoch time of the next scheduled cycle
    pub fn next_due(&self) -> u32 {
        self.next_due
    }

    /// Attempts remaining in the in-flight cycle
    pub fn attempts_left(&self) -> u8 {
        self.attempts_left
    }

    /// Mark the current cycle finished and schedule the next
    fn complete(&mut self, now: u32) {
        self.next_due = now.saturating_add(SYNC_INTERVAL_SECS);
        self.attempts_left = MAX_ATTEMPTS;
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

/// SNTP client over a platform UDP socket
pub struct SntpClient<U: UdpInterface> {
    udp: U,
}

impl<U: UdpInterface> SntpClient<U> {
    /// Create a client over `udp`
    pub fn new(udp: U) -> Self {
        Self { udp }
    }

    /// Get mutable reference to the UDP socket (primarily for tests)
    pub fn udp_mut(&mut self) -> &mut U {
        &mut self.udp
    }

    /// Run one synchronization cycle against `source`
    ///
    /// Attempts the exchange up to [`MAX_ATTEMPTS`] times. On a
    /// well-formed reply the RTC is stepped to the decoded time. In
    /// every outcome `state` ends completed, with the next cycle
    /// scheduled a full interval out.
    ///
    /// Returns `true` if the clock was set.
    ///
    /// # Errors
    ///
    /// Only on socket-level failures that indicate a broken platform,
    /// not on an unresponsive or unresolvable time source — those are
    /// normal operation and resolve to `Ok(false)`.
    pub fn synchronize<R, T>(
        &mut self,
        source: TimeSource<'_>,
        rtc: &mut R,
        timer: &mut T,
        state: &mut SyncState,
    ) -> Result<bool>
    where
        R: RtcInterface,
        T: TimerInterface,
    {
        let addr = match source {
            TimeSource::Address(addr) => addr,
            TimeSource::Hostname(host) => match self.udp.resolve(host) {
                Ok(Some(addr)) => addr,
                Ok(None) | Err(_) => {
                    log_warn!("time source lookup failed");
                    state.complete(rtc.now());
                    return Ok(false);
                }
            },
        };

        let mut request = [0u8; PACKET_SIZE];
        request[0] = REQUEST_HEADER;

        state.attempts_left = MAX_ATTEMPTS;
        while state.attempts_left > 0 {
            state.attempts_left -= 1;

            if self.udp.send_to(addr, SNTP_PORT, &request).is_err() {
                log_debug!("time request send failed");
            } else if let Some(epoch) = self.await_reply(timer)? {
                rtc.set(epoch)?;
                state.complete(rtc.now());
                log_info!("clock synchronized");
                return Ok(true);
            }

            if state.attempts_left > 0 {
                timer.delay_ms(RETRY_DELAY_MS)?;
            }
        }

        // Out of attempts: leave the clock alone and wait out the
        // normal interval before bothering the source again.
        log_warn!("time sync failed, will retry next cycle");
        state.complete(rtc.now());
        Ok(false)
    }

    /// Wait out the bounded reply window, polling the socket
    ///
    /// Returns the decoded Unix epoch seconds from the first
    /// well-formed reply, or `None` when the window closes.
    fn await_reply<T: TimerInterface>(&mut self, timer: &mut T) -> Result<Option<u32>> {
        let mut reply = [0u8; PACKET_SIZE];
        let mut waited_ms: u32 = 0;

        while waited_ms < REPLY_TIMEOUT_MS {
            let n = self.udp.recv(&mut reply)?;
            if n >= PACKET_SIZE {
                let seconds_1900 = u32::from_be_bytes([
                    reply[TRANSMIT_TS_OFFSET],
                    reply[TRANSMIT_TS_OFFSET + 1],
                    reply[TRANSMIT_TS_OFFSET + 2],
                    reply[TRANSMIT_TS_OFFSET + 3],
                ]);
                if seconds_1900 != 0 {
                    return Ok(Some(seconds_1900.wrapping_sub(SECONDS_1900_TO_1970)));
                }
            } else if n > 0 {
                log_debug!("short time reply ignored");
            }

            timer.delay_ms(POLL_STEP_MS)?;
            waited_ms += POLL_STEP_MS;
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockRtc, MockTimer, MockUdp};

    /// Build a minimal well-formed reply carrying `seconds_1900`
    fn reply_with(seconds_1900: u32) -> [u8; PACKET_SIZE] {
        let mut reply = [0u8; PACKET_SIZE];
        reply[0] = 0x1C; // LI = 0, version = 3, mode = 4 (server)
        reply[TRANSMIT_TS_OFFSET..TRANSMIT_TS_OFFSET + 4]
            .copy_from_slice(&seconds_1900.to_be_bytes());
        reply
    }

    #[test]
    fn test_successful_sync_sets_clock() {
        let mut udp = MockUdp::new();
        // 2026-08-06 14:30:05 UTC as seconds since 1900.
        let ntp_seconds = 1_786_026_605u32.wrapping_add(SECONDS_1900_TO_1970);
        udp.inject_datagram(&reply_with(ntp_seconds));

        let mut client = SntpClient::new(udp);
        let mut rtc = MockRtc::new();
        let mut timer = MockTimer::new();
        let mut state = SyncState::new();

        let synced = client
            .synchronize(
                TimeSource::Address([129, 6, 15, 28]),
                &mut rtc,
                &mut timer,
                &mut state,
            )
            .unwrap();

        assert!(synced);
        assert_eq!(rtc.now(), 1_786_026_605);
        assert_eq!(state.next_due(), 1_786_026_605 + SYNC_INTERVAL_SECS);
        assert_eq!(state.attempts_left(), MAX_ATTEMPTS);
    }

    #[test]
    fn test_request_format() {
        let mut udp = MockUdp::new();
        udp.inject_datagram(&reply_with(SECONDS_1900_TO_1970));

        let mut client = SntpClient::new(udp);
        let mut rtc = MockRtc::new();
        let mut timer = MockTimer::new();
        let mut state = SyncState::new();

        client
            .synchronize(
                TimeSource::Address([10, 0, 0, 1]),
                &mut rtc,
                &mut timer,
                &mut state,
            )
            .unwrap();

        let sent = client.udp_mut().sent();
        assert_eq!(sent.len(), 1);
        let (addr, port, payload) = &sent[0];
        assert_eq!(*addr, [10, 0, 0, 1]);
        assert_eq!(*port, SNTP_PORT);
        assert_eq!(payload.len(), PACKET_SIZE);
        assert_eq!(payload[0], REQUEST_HEADER);
        assert!(payload[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_timeout_leaves_clock_and_defers() {
        let mut client = SntpClient::new(MockUdp::new());
        let mut rtc = MockRtc::at(5_000);
        let mut timer = MockTimer::new();
        let mut state = SyncState::new();

        let synced = client
            .synchronize(
                TimeSource::Address([10, 0, 0, 1]),
                &mut rtc,
                &mut timer,
                &mut state,
            )
            .unwrap();

        assert!(!synced);
        // Clock untouched.
        assert_eq!(rtc.now(), 5_000);
        // All attempts were sent.
        assert_eq!(client.udp_mut().sent().len(), MAX_ATTEMPTS as usize);
        // Next cycle a full interval out, not an immediate retry.
        assert_eq!(state.next_due(), 5_000 + SYNC_INTERVAL_SECS);
        assert!(!state.is_due(5_000 + SYNC_INTERVAL_SECS - 1));
        assert!(state.is_due(5_000 + SYNC_INTERVAL_SECS));
    }

    #[test]
    fn test_short_reply_is_ignored() {
        let mut udp = MockUdp::new();
        udp.inject_datagram(b"runt");

        let mut client = SntpClient::new(udp);
        let mut rtc = MockRtc::at(77);
        let mut timer = MockTimer::new();
        let mut state = SyncState::new();

        let synced = client
            .synchronize(
                TimeSource::Address([10, 0, 0, 1]),
                &mut rtc,
                &mut timer,
                &mut state,
            )
            .unwrap();

        assert!(!synced);
        assert_eq!(rtc.now(), 77);
    }

    #[test]
    fn test_hostname_resolution() {
        let mut udp = MockUdp::new();
        udp.set_host("pool.ntp.org", [129, 6, 15, 28]);
        udp.inject_datagram(&reply_with(SECONDS_1900_TO_1970 + 1000));

        let mut client = SntpClient::new(udp);
        let mut rtc = MockRtc::new();
        let mut timer = MockTimer::new();
        let mut state = SyncState::new();

        let synced = client
            .synchronize(
                TimeSource::Hostname("pool.ntp.org"),
                &mut rtc,
                &mut timer,
                &mut state,
            )
            .unwrap();

        assert!(synced);
        assert_eq!(rtc.now(), 1000);
        assert_eq!(client.udp_mut().sent()[0].0, [129, 6, 15, 28]);
    }

    #[test]
    fn test_unresolvable_host_defers_without_sending() {
        let mut client = SntpClient::new(MockUdp::new());
        let mut rtc = MockRtc::at(42);
        let mut timer = MockTimer::new();
        let mut state = SyncState::new();

        let synced = client
            .synchronize(
                TimeSource::Hostname("nowhere.example"),
                &mut rtc,
                &mut timer,
                &mut state,
            )
            .unwrap();

        assert!(!synced);
        assert!(client.udp_mut().sent().is_empty());
        assert_eq!(state.next_due(), 42 + SYNC_INTERVAL_SECS);
    }

    #[test]
    fn test_boot_state_is_due_immediately() {
        let state = SyncState::new();
        assert!(state.is_due(0));
    }
}
