//! Default [`Transport`]: a non-blocking `std::net::TcpStream`.
//!
//! This does not attempt TLS; a caller that needs `smbs://` support
//! supplies its own [`Transport`] wrapping a TLS stream and reports
//! [`Transport::is_tls_ready`] truthfully once the handshake completes.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use crate::traits::Transport;

pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connects to `addr` and puts the stream into non-blocking mode.
    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nonblocking(true)?;
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }
}
