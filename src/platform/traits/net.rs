//! Network interface traits
//!
//! Two seams: a single-client TCP server for the HTTP interface and a
//! UDP socket for the SNTP exchange. Both are polled, never waited on —
//! the appliance serves one request at a time and a second pending
//! connection simply sits in the transport's accept queue.

use crate::platform::Result;

/// Single-connection TCP server
///
/// At most one client is serviced at a time. `poll_accept` promotes a
/// pending connection to the current one without blocking; `read`,
/// `write` and `close` then operate on that connection until it is
/// closed.
pub trait TcpServerInterface {
    /// Poll for a pending client
    ///
    /// Returns `true` if a client is connected after the call (either
    /// already current or newly accepted). Never blocks; returns
    /// `false` immediately when nothing is pending.
    fn poll_accept(&mut self) -> Result<bool>;

    /// Read buffered request bytes from the current client (0 if none)
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write response bytes to the current client
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Close the current client connection
    ///
    /// A no-op when no client is connected.
    fn close(&mut self) -> Result<()>;
}

/// Datagram socket for the time-sync exchange
pub trait UdpInterface {
    /// Send `payload` to `addr:port`
    fn send_to(&mut self, addr: [u8; 4], port: u16, payload: &[u8]) -> Result<()>;

    /// Receive a pending datagram into `buf`, returning its length
    ///
    /// Non-blocking: returns 0 when no datagram is waiting. A datagram
    /// longer than `buf` is truncated to fit.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Resolve a host name to an IPv4 address
    ///
    /// Returns `Ok(None)` when the resolver answered but found no
    /// address; `Err` when resolution itself failed.
    fn resolve(&mut self, host: &str) -> Result<Option<[u8; 4]>>;
}
