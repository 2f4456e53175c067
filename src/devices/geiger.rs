//! Geiger counter driver (line-oriented telemetry)
//!
//! The counting instrument emits ASCII telemetry lines over its serial
//! port, one reading per line:
//!
//! ```text
//! CPS, 5, CPM, 120, uSv/hr, 0.05, SLOW
//! ```
//!
//! Lines are LF-terminated (CR is discarded), begin with the fixed
//! 3-character sentinel `CPS`, and carry comma/space-delimited tokens
//! whose count and meaning are opaque to the driver beyond the
//! sentinel check. The driver reassembles the byte stream into
//! [`Reading`]s: name/value token pairs plus a trailing mode token,
//! stamped with the wall clock at the moment the terminator arrives.
//!
//! The serial link loses bytes in practice. Anything that does not
//! frame cleanly — a line without the sentinel, a buffer that fills
//! without a terminator, bytes that are not UTF-8 — is dropped
//! silently and the driver resynchronizes on the next terminator, or
//! earlier if the sentinel itself reappears mid-stream.
//!
//! # Example
//!
//! ```
//! use radmon::devices::geiger::GeigerDriver;
//! use radmon::platform::mock::{MockRtc, MockUart};
//!
//! let mut uart = MockUart::new(Default::default());
//! uart.inject_rx_data(b"CPS, 5, CPM, 120, uSv/hr, 0.05, SLOW\r\n");
//!
//! let rtc = MockRtc::at(1_786_026_605);
//! let mut geiger = GeigerDriver::new(uart);
//! geiger.poll(&rtc, |_| {}).unwrap();
//!
//! let reading = geiger.current_reading();
//! assert_eq!(reading.fields()[0].name.as_str(), "CPS");
//! assert_eq!(reading.fields()[0].value.as_str(), "5");
//! ```

use crate::core::datetime::DateTime;
use crate::platform::{traits::UartInterface, RtcInterface, Result};
use heapless::{String, Vec};

/// Sentinel token opening every valid telemetry line
pub const SENTINEL: &[u8; 3] = b"CPS";

/// Line reassembly buffer size
///
/// Real instrument lines run ~40 bytes; the headroom absorbs firmware
/// variants with extra fields. A stream that never terminates is
/// bounded here: once full, bytes are dropped until the next
/// terminator or sentinel.
pub const LINE_BUF: usize = 96;

/// Maximum telemetry fields per reading (extras are dropped)
pub const MAX_FIELDS: usize = 8;

/// Maximum field name/value length (longer tokens truncate)
pub const FIELD_LEN: usize = 16;

/// Field name given to the trailing lone mode token
const MODE_FIELD: &str = "Mode";

/// UART read chunk size per poll
const READ_CHUNK: usize = 64;

/// One telemetry field, carried verbatim from the instrument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name token (e.g. `CPS`, `uSv/hr`)
    pub name: String<FIELD_LEN>,
    /// Field value token, uninterpreted text
    pub value: String<FIELD_LEN>,
}

/// The latest parsed telemetry sample
///
/// Empty (no timestamp, no fields) until the first valid line
/// completes; thereafter replaced wholesale each time a line is
/// accepted, so consumers never see a partial reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reading {
    timestamp: Option<DateTime>,
    fields: Vec<Field, MAX_FIELDS>,
}

impl Reading {
    /// Create the empty pre-first-line reading
    pub fn empty() -> Self {
        Self::default()
    }

    /// True before the first complete line has arrived
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none()
    }

    /// Wall-clock stamp taken when the line's terminator was consumed
    pub fn timestamp(&self) -> Option<DateTime> {
        self.timestamp
    }

    /// Telemetry fields in instrument order, mode last
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Parse an accepted line into a stamped reading
    ///
    /// Tokens split on commas and spaces pair up as name/value; a
    /// trailing lone token is surfaced as the `Mode` field. Token
    /// overlength and field overflow truncate silently.
    pub(crate) fn from_line(line: &str, stamp: DateTime) -> Self {
        let mut fields = Vec::new();

        let mut tokens = line.split([',', ' ']).filter(|t| !t.is_empty());
        loop {
            let Some(name) = tokens.next() else { break };
            match tokens.next() {
                Some(value) => {
                    if fields
                        .push(Field {
                            name: truncated(name),
                            value: truncated(value),
                        })
                        .is_err()
                    {
                        break;
                    }
                }
                None => {
                    // Lone trailing token is the operating mode.
                    fields
                        .push(Field {
                            name: truncated(MODE_FIELD),
                            value: truncated(name),
                        })
                        .ok();
                    break;
                }
            }
        }

        Self {
            timestamp: Some(stamp),
            fields,
        }
    }
}

/// Copy a token into a bounded string, truncating at capacity
fn truncated(token: &str) -> String<FIELD_LEN> {
    let mut s = String::new();
    let mut end = token.len().min(FIELD_LEN);
    while !token.is_char_boundary(end) {
        end -= 1;
    }
    s.push_str(&token[..end]).ok();
    s
}

/// Geiger counter driver
///
/// Generic over any [`UartInterface`], so the same framing logic runs
/// against hardware, the simulation bridge, or a mock.
pub struct GeigerDriver<U: UartInterface> {
    uart: U,
    line: Vec<u8, LINE_BUF>,
    /// Dropping bytes after overflow, until the next terminator
    discarding: bool,
    /// Last three non-CR bytes, for sentinel re-detection
    tail: [u8; 3],
    reading: Reading,
}

impl<U: UartInterface> GeigerDriver<U> {
    /// Create a new driver over `uart`
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            line: Vec::new(),
            discarding: false,
            tail: [0; 3],
            reading: Reading::empty(),
        }
    }

    /// Get mutable reference to the UART (primarily for tests)
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// The latest complete reading (empty before the first line)
    pub fn current_reading(&self) -> &Reading {
        &self.reading
    }

    /// Drain the UART and feed every byte through the framer
    ///
    /// `echo` receives each raw chunk as read, before any framing —
    /// the hook behind the console's verbose echo. Returns `true` if
    /// at least one new reading completed during this poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the UART read fails.
    pub fn poll<R: RtcInterface>(
        &mut self,
        rtc: &R,
        mut echo: impl FnMut(&[u8]),
    ) -> Result<bool> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut completed = false;

        loop {
            let n = self.uart.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            echo(&chunk[..n]);
            for &byte in &chunk[..n] {
                if self.feed(byte, rtc.now()) {
                    completed = true;
                }
            }
        }

        Ok(completed)
    }

    /// Consume one raw serial byte
    ///
    /// `now` is the current wall clock; it becomes the reading's
    /// timestamp if this byte completes a valid line. Returns `true`
    /// exactly when a new reading replaced the current one.
    pub fn feed(&mut self, byte: u8, now: u32) -> bool {
        // CR is discarded unconditionally, before any other handling.
        if byte == b'\r' {
            return false;
        }

        if byte == b'\n' {
            let accepted = self.complete_line(now);
            self.line.clear();
            self.discarding = false;
            self.tail = [0; 3];
            return accepted;
        }

        self.tail = [self.tail[1], self.tail[2], byte];

        if &self.tail == SENTINEL && self.line.len() != SENTINEL.len() {
            // Sentinel reappeared mid-stream: the bytes before it were
            // a casualty of link loss. Restart the line from the
            // sentinel rather than waiting out the terminator.
            self.line.clear();
            self.line.extend_from_slice(SENTINEL).ok();
            self.discarding = false;
            return false;
        }

        if self.discarding {
            return false;
        }

        if self.line.push(byte).is_err() {
            // Buffer full without a terminator; drop the line.
            self.discarding = true;
        }

        false
    }

    /// Validate and parse the buffered line at its terminator
    fn complete_line(&mut self, now: u32) -> bool {
        if self.discarding || !self.line.starts_with(SENTINEL) {
            return false;
        }
        let Ok(text) = core::str::from_utf8(&self.line) else {
            return false;
        };
        self.reading = Reading::from_line(text, DateTime::from_epoch(now));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockRtc, MockUart};
    use crate::platform::traits::UartConfig;

    const LINE: &[u8] = b"CPS, 5, CPM, 120, uSv/hr, 0.05, SLOW\r\n";

    fn driver() -> GeigerDriver<MockUart> {
        GeigerDriver::new(MockUart::new(UartConfig::default()))
    }

    fn feed_all(geiger: &mut GeigerDriver<MockUart>, bytes: &[u8], now: u32) -> bool {
        let mut completed = false;
        for &b in bytes {
            if geiger.feed(b, now) {
                completed = true;
            }
        }
        completed
    }

    #[test]
    fn test_empty_before_first_line() {
        let geiger = driver();
        assert!(geiger.current_reading().is_empty());
        assert!(geiger.current_reading().fields().is_empty());
    }

    #[test]
    fn test_well_formed_line_parses() {
        let mut geiger = driver();
        assert!(feed_all(&mut geiger, LINE, 1_786_026_605));

        let reading = geiger.current_reading();
        let fields = reading.fields();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].name.as_str(), "CPS");
        assert_eq!(fields[0].value.as_str(), "5");
        assert_eq!(fields[1].name.as_str(), "CPM");
        assert_eq!(fields[1].value.as_str(), "120");
        assert_eq!(fields[2].name.as_str(), "uSv/hr");
        assert_eq!(fields[2].value.as_str(), "0.05");
        assert_eq!(fields[3].name.as_str(), "Mode");
        assert_eq!(fields[3].value.as_str(), "SLOW");
    }

    #[test]
    fn test_timestamp_taken_at_terminator() {
        let mut geiger = driver();
        // Body fed at one time, terminator at another: the stamp must
        // come from the terminator's clock.
        feed_all(&mut geiger, &LINE[..LINE.len() - 1], 100);
        assert!(geiger.feed(b'\n', 1_786_026_605));

        let stamp = geiger.current_reading().timestamp().unwrap();
        assert_eq!(stamp, DateTime::from_epoch(1_786_026_605));
    }

    #[test]
    fn test_non_sentinel_bytes_leave_reading_unchanged() {
        let mut geiger = driver();
        feed_all(&mut geiger, LINE, 50);
        let before = geiger.current_reading().clone();

        assert!(!feed_all(
            &mut geiger,
            b"garbage with no sentinel\nMore, 1, junk\n\n",
            99
        ));
        assert_eq!(*geiger.current_reading(), before);
    }

    #[test]
    fn test_sentinel_resync_mid_buffer() {
        let mut geiger = driver();
        // Link loss glued a partial line onto a fresh one; the fresh
        // line must still be accepted via sentinel re-detection.
        assert!(feed_all(
            &mut geiger,
            b"PM, 120, uSv/hr, 0.0CPS, 7, CPM, 98, uSv/hr, 0.04, FAST\n",
            60
        ));

        let fields = geiger.current_reading().fields();
        assert_eq!(fields[0].value.as_str(), "7");
        assert_eq!(fields[3].value.as_str(), "FAST");
    }

    #[test]
    fn test_overflow_is_bounded_and_recovers() {
        let mut geiger = driver();

        // Sentinel-led line that never terminates: must not overflow,
        // must not produce a reading.
        let mut flood = std::vec::Vec::new();
        flood.extend_from_slice(b"CPS, ");
        flood.extend_from_slice(&[b'9'; 300]);
        assert!(!feed_all(&mut geiger, &flood, 10));
        assert!(geiger.current_reading().is_empty());

        // The terminator clears the jam; the next line frames cleanly.
        assert!(!geiger.feed(b'\n', 10));
        assert!(feed_all(&mut geiger, LINE, 20));
        assert_eq!(geiger.current_reading().fields().len(), 4);
    }

    #[test]
    fn test_sentinel_recovers_from_overflow_without_terminator() {
        let mut geiger = driver();

        let flood = [b'x'; 200];
        feed_all(&mut geiger, &flood, 10);
        // Sentinel arrives with no terminator in between.
        assert!(feed_all(&mut geiger, LINE, 30));
        assert_eq!(geiger.current_reading().fields().len(), 4);
    }

    #[test]
    fn test_cr_only_terminator_does_not_complete() {
        let mut geiger = driver();
        assert!(!feed_all(&mut geiger, b"CPS, 5, CPM, 120, uSv/hr, 0.05, SLOW\r", 5));
        assert!(geiger.current_reading().is_empty());
    }

    #[test]
    fn test_poll_reads_uart_and_echoes() {
        let mut geiger = driver();
        geiger.uart_mut().inject_rx_data(LINE);

        let rtc = MockRtc::at(1_786_026_605);
        let mut echoed = std::vec::Vec::new();
        let completed = geiger.poll(&rtc, |chunk| echoed.extend_from_slice(chunk)).unwrap();

        assert!(completed);
        assert_eq!(echoed, LINE);
        assert_eq!(
            geiger.current_reading().timestamp().unwrap(),
            DateTime::from_epoch(1_786_026_605)
        );
    }

    #[test]
    fn test_new_line_replaces_reading_atomically() {
        let mut geiger = driver();
        feed_all(&mut geiger, LINE, 100);
        assert_eq!(geiger.current_reading().fields()[0].value.as_str(), "5");

        feed_all(&mut geiger, b"CPS, 9, CPM, 201, uSv/hr, 0.09, FAST\n", 200);
        let reading = geiger.current_reading();
        assert_eq!(reading.fields()[0].value.as_str(), "9");
        assert_eq!(reading.timestamp().unwrap(), DateTime::from_epoch(200));
    }

    #[test]
    fn test_extra_fields_truncate_silently() {
        let mut geiger = driver();
        // More pairs than MAX_FIELDS: parse keeps the first table-full.
        feed_all(
            &mut geiger,
            b"CPS, 1, a, 2, b, 3, c, 4, d, 5, e, 6, f, 7, g, 8, h, 9\n",
            5,
        );
        assert_eq!(geiger.current_reading().fields().len(), MAX_FIELDS);
    }
}
