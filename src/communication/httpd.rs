//! HTTP request server
//!
//! Publishes the latest reading to network clients. This is not a web
//! server: it recognizes just enough of HTTP to pick one of a fixed
//! set of routes and always answers with a complete, closed response.
//!
//! # Routes
//!
//! | Path     | Response                                         |
//! |----------|--------------------------------------------------|
//! | `/`      | HTML page embedding the current reading          |
//! | `/rdata` | machine-readable line for the collection agent   |
//! | `/reset` | `ok`, then a full appliance restart              |
//! | other    | fixed not-found page                             |
//!
//! Every response advertises a short `Refresh` interval so a polling
//! client that never receives a push still re-requests on its own.
//!
//! Parsing is a byte scan, not a header parser: find the literal
//! `GET ` prefix, copy the path up to the next whitespace into a
//! bounded buffer (oversized paths truncate silently), then consume
//! until the blank line — two consecutive line feeds, carriage returns
//! discarded. A request that closes or truncates before a path
//! resolves is answered with the not-found page; nothing beyond the
//! HTTP status text is ever reported to the client.

use crate::devices::geiger::Reading;
use crate::log_debug;
use crate::platform::{
    traits::{TcpServerInterface, TimerInterface},
    Result,
};
use core::fmt::Write as _;
use heapless::String;

/// TCP port the server listens on
pub const HTTP_PORT: u16 = 80;

/// Client auto-refresh interval advertised in every response
pub const REFRESH_SECS: u8 = 2;

/// Request-line prefix that opens a request
const REQUEST_PREFIX: &[u8] = b"GET ";

/// Path buffer size; longer paths truncate silently
const PATH_BUF: usize = 32;

/// Rendered page buffer size
const PAGE_BUF: usize = 1024;

/// Read chunk size per socket poll
const READ_CHUNK: usize = 64;

/// Idle polls tolerated while waiting for request bytes
const READ_IDLE_LIMIT: u32 = 50;

/// Delay between idle request polls
const READ_IDLE_DELAY_MS: u32 = 2;

/// Delay letting a written response drain before close
const DRAIN_DELAY_MS: u32 = 5;

/// Outcome of one server invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerAction {
    /// No client was pending
    Idle,
    /// One request was answered and the connection closed
    Handled,
    /// `/reset` was answered; the appliance should restart now
    RestartRequested,
}

/// Request scanning states
enum Scan {
    /// Matching the `GET ` prefix, with bytes matched so far
    Prefix(usize),
    /// Copying the path until whitespace
    Path,
    /// Consuming headers until the blank line
    Headers,
}

/// HTTP server over a platform TCP socket
pub struct HttpServer<T: TcpServerInterface> {
    tcp: T,
}

impl<T: TcpServerInterface> HttpServer<T> {
    /// Create a server over `tcp`
    pub fn new(tcp: T) -> Self {
        Self { tcp }
    }

    /// Get mutable reference to the TCP socket (primarily for tests)
    pub fn tcp_mut(&mut self) -> &mut T {
        &mut self.tcp
    }

    /// Serve at most one pending connection
    ///
    /// Never blocks waiting for a connection: returns
    /// [`ServerAction::Idle`] immediately when none is pending.
    /// Otherwise reads the request within a bounded poll budget,
    /// writes exactly one response rendered from `reading`, lets it
    /// drain briefly, and closes.
    ///
    /// # Errors
    ///
    /// Returns an error only on socket-level failures; a malformed or
    /// truncated request is not an error, it is the not-found route.
    pub fn handle_one_connection<W: TimerInterface>(
        &mut self,
        reading: &Reading,
        timer: &mut W,
    ) -> Result<ServerAction> {
        if !self.tcp.poll_accept()? {
            return Ok(ServerAction::Idle);
        }

        let (path, path_complete) = self.read_request(timer)?;

        let action = if !path_complete {
            log_debug!("request without a resolvable path");
            self.respond(&not_found_page(), "404 Not Found", "text/html", timer)?;
            ServerAction::Handled
        } else {
            match path.as_str() {
                "/" => {
                    self.respond(&html_page(reading), "200 OK", "text/html", timer)?;
                    ServerAction::Handled
                }
                "/rdata" => {
                    self.respond(&raw_line(reading), "200 OK", "text/plain", timer)?;
                    ServerAction::Handled
                }
                "/reset" => {
                    self.respond(&ok_body(), "200 OK", "text/html", timer)?;
                    ServerAction::RestartRequested
                }
                _ => {
                    self.respond(&not_found_page(), "404 Not Found", "text/html", timer)?;
                    ServerAction::Handled
                }
            }
        };

        self.tcp.close()?;
        Ok(action)
    }

    /// Scan the request for the path and the end of the header block
    ///
    /// Returns the extracted path and whether it was terminated by
    /// whitespace (an unterminated or prefix-less request yields an
    /// incomplete path and falls through to the not-found route).
    fn read_request<W: TimerInterface>(
        &mut self,
        timer: &mut W,
    ) -> Result<(String<PATH_BUF>, bool)> {
        let mut chunk = [0u8; READ_CHUNK];
        let mut path: String<PATH_BUF> = String::new();
        let mut state = Scan::Prefix(0);
        let mut path_complete = false;
        let mut last_was_lf = false;
        let mut idle_polls: u32 = 0;

        'scan: loop {
            let n = self.tcp.read(&mut chunk)?;
            if n == 0 {
                idle_polls += 1;
                if idle_polls > READ_IDLE_LIMIT {
                    // Client stalled or closed without a full request.
                    break;
                }
                timer.delay_ms(READ_IDLE_DELAY_MS)?;
                continue;
            }
            idle_polls = 0;

            for &byte in &chunk[..n] {
                if byte == b'\r' {
                    continue;
                }
                match state {
                    Scan::Prefix(matched) => {
                        if byte == REQUEST_PREFIX[matched] {
                            if matched + 1 == REQUEST_PREFIX.len() {
                                state = Scan::Path;
                            } else {
                                state = Scan::Prefix(matched + 1);
                            }
                        } else {
                            state = Scan::Prefix(usize::from(byte == REQUEST_PREFIX[0]));
                        }
                        last_was_lf = byte == b'\n';
                    }
                    Scan::Path => {
                        if byte == b' ' || byte == b'\t' || byte == b'\n' {
                            path_complete = true;
                            last_was_lf = byte == b'\n';
                            state = Scan::Headers;
                        } else {
                            // Overlong paths truncate; keep scanning.
                            let _ = path.push(byte as char);
                        }
                    }
                    Scan::Headers => {
                        if byte == b'\n' {
                            if last_was_lf {
                                break 'scan;
                            }
                            last_was_lf = true;
                        } else {
                            last_was_lf = false;
                        }
                    }
                }
            }
        }

        Ok((path, path_complete))
    }

    /// Write the status/header block and body, then let them drain
    fn respond<W: TimerInterface>(
        &mut self,
        body: &str,
        status: &str,
        content_type: &str,
        timer: &mut W,
    ) -> Result<()> {
        let mut head: String<128> = String::new();
        let _ = write!(
            head,
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nConnection: close\r\nRefresh: {}\r\n\r\n",
            status, content_type, REFRESH_SECS
        );

        self.write_all(head.as_bytes(), timer)?;
        self.write_all(body.as_bytes(), timer)?;
        timer.delay_ms(DRAIN_DELAY_MS)?;
        Ok(())
    }

    /// Write every byte, tolerating short writes with bounded retries
    fn write_all<W: TimerInterface>(&mut self, mut data: &[u8], timer: &mut W) -> Result<()> {
        let mut stalls: u32 = 0;
        while !data.is_empty() {
            let n = self.tcp.write(data)?;
            data = &data[n..];
            if n == 0 {
                stalls += 1;
                if stalls > READ_IDLE_LIMIT {
                    // Peer stopped draining; abandon the remainder.
                    break;
                }
                timer.delay_ms(READ_IDLE_DELAY_MS)?;
            } else {
                stalls = 0;
            }
        }
        Ok(())
    }
}

/// Render the machine-readable reading line
///
/// `$,UTC=<hh:mm:ss mm/dd/yyyy>,<name>=<value>,...,#` with fields in
/// instrument order, mode last — the format the collection agent
/// splits on commas and equals signs. An appliance that has not yet
/// framed a reading answers the bare `$,#`.
fn raw_line(reading: &Reading) -> String<PAGE_BUF> {
    let mut page: String<PAGE_BUF> = String::new();
    let _ = page.push_str("$,");
    if let Some(stamp) = reading.timestamp() {
        let _ = write!(page, "UTC={},", stamp);
        for field in reading.fields() {
            let _ = write!(page, "{}={},", field.name, field.value);
        }
    }
    let _ = page.push_str("#");
    page
}

/// Render the human-facing HTML page
fn html_page(reading: &Reading) -> String<PAGE_BUF> {
    let mut page: String<PAGE_BUF> = String::new();
    let _ = page.push_str(
        "<!DOCTYPE html>\n<html>\n<head><title>Radiation Monitor</title></head>\n<body>\n<h2>Radiation Monitor</h2>\n",
    );
    match reading.timestamp() {
        Some(stamp) => {
            let _ = write!(page, "<p>{} UTC</p>\n<table>\n", stamp);
            for field in reading.fields() {
                let _ = write!(
                    page,
                    "<tr><td>{}</td><td>{}</td></tr>\n",
                    field.name, field.value
                );
            }
            let _ = page.push_str("</table>\n");
        }
        None => {
            let _ = page.push_str("<p>awaiting first reading</p>\n");
        }
    }
    let _ = page.push_str("</body>\n</html>\n");
    page
}

/// Fixed not-found page
fn not_found_page() -> String<PAGE_BUF> {
    let mut page: String<PAGE_BUF> = String::new();
    let _ = page.push_str("<html><body><h2>404 Not Found</h2></body></html>\n");
    page
}

/// Body acknowledging a reset request
fn ok_body() -> String<PAGE_BUF> {
    let mut page: String<PAGE_BUF> = String::new();
    let _ = page.push_str("ok");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::datetime::DateTime;
    use crate::platform::mock::{MockTcpServer, MockTimer};

    fn sample_reading() -> Reading {
        Reading::from_line(
            "CPS, 5, CPM, 120, uSv/hr, 0.05, SLOW",
            DateTime::from_epoch(1_786_026_605),
        )
    }

    fn server_with(request: &[u8]) -> HttpServer<MockTcpServer> {
        let mut tcp = MockTcpServer::new();
        tcp.inject_client(request);
        HttpServer::new(tcp)
    }

    fn body_of(response: &str) -> &str {
        response.split("\r\n\r\n").nth(1).unwrap()
    }

    #[test]
    fn test_idle_when_no_client() {
        let mut server = HttpServer::new(MockTcpServer::new());
        let mut timer = MockTimer::new();

        let action = server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();
        assert_eq!(action, ServerAction::Idle);
        assert!(server.tcp_mut().responses().is_empty());
    }

    #[test]
    fn test_root_serves_html() {
        let mut server = server_with(b"GET / HTTP/1.1\r\nHost: radmon\r\n\r\n");
        let mut timer = MockTimer::new();

        let action = server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();
        assert_eq!(action, ServerAction::Handled);

        let response = server.tcp_mut().last_response().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Refresh: 2\r\n"));
        assert!(response.contains("<td>CPS</td><td>5</td>"));
        assert!(response.contains("<td>Mode</td><td>SLOW</td>"));
        assert!(response.contains("14:30:05 08/06/2026 UTC"));
    }

    #[test]
    fn test_rdata_exact_format() {
        let mut server = server_with(b"GET /rdata HTTP/1.1\r\n\r\n");
        let mut timer = MockTimer::new();

        server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();

        let response = server.tcp_mut().last_response().unwrap();
        assert_eq!(
            body_of(&response),
            "$,UTC=14:30:05 08/06/2026,CPS=5,CPM=120,uSv/hr=0.05,Mode=SLOW,#"
        );
    }

    #[test]
    fn test_rdata_before_first_reading() {
        let mut server = server_with(b"GET /rdata HTTP/1.1\r\n\r\n");
        let mut timer = MockTimer::new();

        server
            .handle_one_connection(&Reading::empty(), &mut timer)
            .unwrap();

        let response = server.tcp_mut().last_response().unwrap();
        assert_eq!(body_of(&response), "$,#");
    }

    #[test]
    fn test_reset_replies_ok_then_requests_restart() {
        let mut server = server_with(b"GET /reset HTTP/1.1\r\n\r\n");
        let mut timer = MockTimer::new();

        let action = server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();
        assert_eq!(action, ServerAction::RestartRequested);

        // The reply is fully written and the connection closed before
        // the restart propagates.
        let response = server.tcp_mut().last_response().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(body_of(&response), "ok");
    }

    #[test]
    fn test_unknown_path_serves_not_found() {
        for request in [
            b"GET /status HTTP/1.1\r\n\r\n".as_slice(),
            b"GET /rdata/extra HTTP/1.1\r\n\r\n".as_slice(),
            b"GET // HTTP/1.1\r\n\r\n".as_slice(),
        ] {
            let mut server = server_with(request);
            let mut timer = MockTimer::new();

            let action = server
                .handle_one_connection(&sample_reading(), &mut timer)
                .unwrap();
            assert_eq!(action, ServerAction::Handled);

            let response = server.tcp_mut().last_response().unwrap();
            assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
            assert!(response.contains("404 Not Found"));
        }
    }

    #[test]
    fn test_request_without_prefix_serves_not_found() {
        let mut server = server_with(b"BOGUS /rdata\r\n\r\n");
        let mut timer = MockTimer::new();

        server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();

        let response = server.tcp_mut().last_response().unwrap();
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn test_oversized_path_truncates_to_not_found() {
        let mut request = std::vec::Vec::new();
        request.extend_from_slice(b"GET /");
        request.extend_from_slice(&[b'a'; 300]);
        request.extend_from_slice(b" HTTP/1.1\r\n\r\n");

        let mut server = server_with(&request);
        let mut timer = MockTimer::new();

        let action = server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();
        assert_eq!(action, ServerAction::Handled);

        let response = server.tcp_mut().last_response().unwrap();
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn test_bare_lf_request_is_accepted() {
        let mut server = server_with(b"GET /rdata\n\n");
        let mut timer = MockTimer::new();

        server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();

        let response = server.tcp_mut().last_response().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[test]
    fn test_stalled_request_falls_through_to_not_found() {
        // Connection opens but only half a request line ever arrives.
        let mut server = server_with(b"GET /rda");
        let mut timer = MockTimer::new();

        let action = server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();
        assert_eq!(action, ServerAction::Handled);

        let response = server.tcp_mut().last_response().unwrap();
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }

    #[test]
    fn test_one_connection_per_invocation() {
        let mut tcp = MockTcpServer::new();
        tcp.inject_client(b"GET /rdata HTTP/1.1\r\n\r\n");
        tcp.inject_client(b"GET / HTTP/1.1\r\n\r\n");
        let mut server = HttpServer::new(tcp);
        let mut timer = MockTimer::new();

        server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();
        assert_eq!(server.tcp_mut().responses().len(), 1);

        server
            .handle_one_connection(&sample_reading(), &mut timer)
            .unwrap();
        assert_eq!(server.tcp_mut().responses().len(), 2);
    }
}
