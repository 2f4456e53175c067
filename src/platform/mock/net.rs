//! Mock network implementations for testing
//!
//! `MockTcpServer` scripts HTTP clients: tests enqueue raw request
//! bytes with `inject_client`, the server under test reads them as one
//! connection, and the bytes it writes back are captured per
//! connection. `MockUdp` queues datagrams both ways and answers host
//! lookups from a scripted table.

use crate::platform::{
    error::NetError,
    traits::{TcpServerInterface, UdpInterface},
    Result,
};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

/// Mock single-connection TCP server
///
/// # Example
///
/// ```
/// use radmon::platform::mock::MockTcpServer;
/// use radmon::platform::traits::TcpServerInterface;
///
/// let mut tcp = MockTcpServer::new();
/// tcp.inject_client(b"GET /rdata HTTP/1.1\r\n\r\n");
///
/// assert!(tcp.poll_accept().unwrap());
/// let mut buf = [0u8; 64];
/// let n = tcp.read(&mut buf).unwrap();
/// assert!(n > 0);
/// tcp.write(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
/// tcp.close().unwrap();
/// assert_eq!(tcp.responses().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTcpServer {
    pending: VecDeque<Vec<u8>>,
    current_rx: Vec<u8>,
    current_tx: Vec<u8>,
    connected: bool,
    responses: Vec<Vec<u8>>,
}

impl MockTcpServer {
    /// Create a server with no pending clients
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a client connection that will send `request`
    pub fn inject_client(&mut self, request: &[u8]) {
        self.pending.push_back(request.to_vec());
    }

    /// Responses written to completed connections, oldest first
    pub fn responses(&self) -> &[Vec<u8>] {
        &self.responses
    }

    /// Last completed response as a lossy string
    pub fn last_response(&self) -> Option<String> {
        self.responses
            .last()
            .map(|r| String::from_utf8_lossy(r).into_owned())
    }
}

impl TcpServerInterface for MockTcpServer {
    fn poll_accept(&mut self) -> Result<bool> {
        if self.connected {
            return Ok(true);
        }
        match self.pending.pop_front() {
            Some(request) => {
                self.current_rx = request;
                self.current_tx = Vec::new();
                self.connected = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.connected {
            return Err(NetError::ConnectionClosed.into());
        }
        let to_read = core::cmp::min(buf.len(), self.current_rx.len());
        buf[..to_read].copy_from_slice(&self.current_rx[..to_read]);
        self.current_rx.drain(..to_read);
        Ok(to_read)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if !self.connected {
            return Err(NetError::ConnectionClosed.into());
        }
        self.current_tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn close(&mut self) -> Result<()> {
        if self.connected {
            self.responses.push(core::mem::take(&mut self.current_tx));
            self.current_rx.clear();
            self.connected = false;
        }
        Ok(())
    }
}

/// Mock UDP socket
///
/// Captures outbound datagrams for verification and hands queued
/// inbound datagrams to `recv`. Host lookups come from a scripted
/// table; unknown hosts resolve to `None`.
#[derive(Debug, Default)]
pub struct MockUdp {
    sent: Vec<([u8; 4], u16, Vec<u8>)>,
    rx_queue: VecDeque<Vec<u8>>,
    hosts: Vec<(String, [u8; 4])>,
}

impl MockUdp {
    /// Create a socket with nothing queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an inbound datagram
    pub fn inject_datagram(&mut self, data: &[u8]) {
        self.rx_queue.push_back(data.to_vec());
    }

    /// Script a host-name lookup result
    pub fn set_host(&mut self, host: &str, addr: [u8; 4]) {
        self.hosts.push((String::from(host), addr));
    }

    /// Datagrams sent so far, as (address, port, payload)
    pub fn sent(&self) -> &[([u8; 4], u16, Vec<u8>)] {
        &self.sent
    }
}

impl UdpInterface for MockUdp {
    fn send_to(&mut self, addr: [u8; 4], port: u16, payload: &[u8]) -> Result<()> {
        self.sent.push((addr, port, payload.to_vec()));
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.rx_queue.pop_front() {
            Some(datagram) => {
                let to_read = core::cmp::min(buf.len(), datagram.len());
                buf[..to_read].copy_from_slice(&datagram[..to_read]);
                Ok(to_read)
            }
            None => Ok(0),
        }
    }

    fn resolve(&mut self, host: &str) -> Result<Option<[u8; 4]>> {
        Ok(self
            .hosts
            .iter()
            .find(|(name, _)| name == host)
            .map(|(_, addr)| *addr))
    }
}
