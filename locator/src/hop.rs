use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::transport::Transport;

/// One destination a SIP request may be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hop {
    address: IpAddr,
    port: u16,
    transport: Transport,
}

impl Hop {
    /// Creates a hop.
    pub fn new(address: IpAddr, port: u16, transport: Transport) -> Self {
        Self {
            address,
            port,
            transport,
        }
    }

    /// Returns the IP address.
    pub fn address(&self) -> IpAddr {
        self.address
    }

    /// Returns the port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the transport.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Returns the address and port as a [`SocketAddr`].
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.socket_addr(), self.transport)
    }
}
