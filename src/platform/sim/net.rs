//! std-socket network implementations for the simulation platform

use crate::platform::{
    error::NetError,
    traits::{TcpServerInterface, UdpInterface},
    Result,
};
use std::io::{ErrorKind, Read, Write};
use std::net::{Ipv4Addr, SocketAddrV4, TcpListener, TcpStream, ToSocketAddrs, UdpSocket};

use super::SimError;

/// Single-connection TCP server over a std listener
pub struct SimTcpServer {
    listener: TcpListener,
    client: Option<TcpStream>,
}

impl SimTcpServer {
    /// Listen on `port` (all interfaces)
    pub fn bind(port: u16) -> core::result::Result<Self, SimError> {
        let listener = TcpListener::bind(("0.0.0.0", port))?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            client: None,
        })
    }
}

impl TcpServerInterface for SimTcpServer {
    fn poll_accept(&mut self) -> Result<bool> {
        if self.client.is_some() {
            return Ok(true);
        }
        match self.listener.accept() {
            Ok((stream, _)) => {
                stream
                    .set_nonblocking(true)
                    .map_err(|_| NetError::BindFailed)?;
                self.client = Some(stream);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(false),
            Err(_) => Err(NetError::ReceiveFailed.into()),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(client) = self.client.as_mut() else {
            return Ok(0);
        };
        match client.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(_) => {
                self.client = None;
                Ok(0)
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        // A vanished peer means a half-sent reply gets abandoned, not
        // reported: the next poll serves whoever connects next.
        let Some(client) = self.client.as_mut() else {
            return Ok(data.len());
        };
        match client.write(data) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(_) => {
                self.client = None;
                Ok(data.len())
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            let _ = client.shutdown(std::net::Shutdown::Both);
        }
        Ok(())
    }
}

/// UDP socket over std, with std name resolution
pub struct SimUdp {
    socket: UdpSocket,
}

impl SimUdp {
    /// Bind to `port` on all interfaces
    pub fn bind(port: u16) -> core::result::Result<Self, SimError> {
        let socket = UdpSocket::bind(("0.0.0.0", port))?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket })
    }
}

impl UdpInterface for SimUdp {
    fn send_to(&mut self, addr: [u8; 4], port: u16, payload: &[u8]) -> Result<()> {
        let dest = SocketAddrV4::new(Ipv4Addr::from(addr), port);
        self.socket
            .send_to(payload, dest)
            .map_err(|_| NetError::SendFailed)?;
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.socket.recv_from(buf) {
            Ok((n, _)) => Ok(n),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(_) => Err(NetError::ReceiveFailed.into()),
        }
    }

    fn resolve(&mut self, host: &str) -> Result<Option<[u8; 4]>> {
        let addrs = (host, 0u16)
            .to_socket_addrs()
            .map_err(|_| NetError::ResolveFailed)?;
        for addr in addrs {
            if let std::net::IpAddr::V4(v4) = addr.ip() {
                return Ok(Some(v4.octets()));
            }
        }
        Ok(None)
    }
}
