//! TCP-bridged serial port for the simulation platform
//!
//! A listening TCP port stands in for a UART: whatever a connected
//! client sends is the receive stream, whatever the appliance writes
//! goes back to the client. One client at a time, like one cable.

use crate::platform::{
    error::UartError,
    traits::{UartConfig, UartInterface},
    Result,
};
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};

use super::SimError;

/// Simulated UART bridged over a local TCP port
pub struct SimUart {
    listener: TcpListener,
    client: Option<TcpStream>,
    config: UartConfig,
}

impl SimUart {
    /// Listen on `port` for the bridge peer
    pub fn bind(port: u16, config: UartConfig) -> core::result::Result<Self, SimError> {
        let listener = TcpListener::bind(("127.0.0.1", port))?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            client: None,
            config,
        })
    }

    /// Accept a waiting bridge peer, if any
    fn poll_client(&mut self) {
        if self.client.is_some() {
            return;
        }
        if let Ok((stream, _)) = self.listener.accept() {
            if stream.set_nonblocking(true).is_ok() {
                self.client = Some(stream);
            }
        }
    }
}

impl UartInterface for SimUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.poll_client();
        let Some(client) = self.client.as_mut() else {
            // Nothing on the other end of the cable; bits fall out.
            return Ok(data.len());
        };
        match client.write(data) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(_) => {
                self.client = None;
                Err(UartError::WriteFailed.into())
            }
        }
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.poll_client();
        let Some(client) = self.client.as_mut() else {
            return Ok(0);
        };
        match client.read(buffer) {
            Ok(0) => {
                // Peer hung up; wait for the next one.
                self.client = None;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
            Err(_) => {
                self.client = None;
                Ok(0)
            }
        }
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<()> {
        self.config.baud_rate = baud;
        Ok(())
    }

    fn available(&self) -> bool {
        match self.client.as_ref() {
            Some(client) => {
                let mut probe = [0u8; 1];
                matches!(client.peek(&mut probe), Ok(n) if n > 0)
            }
            None => false,
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(client) = self.client.as_mut() {
            client.flush().map_err(|_| UartError::WriteFailed)?;
        }
        Ok(())
    }
}
