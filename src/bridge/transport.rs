//! Client side of the bridge handshake and ping.
//!
//! The bridge greets each connection with a single line such as
//! `WELCOME UNITY-MCP 1 FRAMING=1`. After that, messages are framed with an
//! 8-byte big-endian length header. toolbridge only ever sends `ping` and
//! expects a reply containing `pong`.

use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;
use thiserror::Error;

/// Greeting prefix every bridge sends.
pub const GREETING_PREFIX: &str = "WELCOME UNITY-MCP";

/// Greeting token advertising length-prefixed framing.
pub const FRAMING_TOKEN: &str = "FRAMING=1";

/// Largest frame accepted from the bridge.
pub const MAX_FRAME_LEN: u64 = 64 * 1024;

/// Longest greeting line read before giving up.
const MAX_GREETING_LEN: usize = 256;

/// Why a handshake or ping failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not connect to port {port}: {source}")]
    Connect {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("timed out waiting for the bridge")]
    Timeout,

    #[error("connection closed by the bridge")]
    Closed,

    #[error("unexpected greeting '{0}'")]
    InvalidGreeting(String),

    #[error("bridge does not support framed messages")]
    FramingUnsupported,

    #[error("frame of {0} bytes exceeds the 64 KiB limit")]
    FrameTooLarge(u64),

    #[error("unexpected reply '{0}'")]
    UnexpectedReply(String),

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportError::Timeout,
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => TransportError::Closed,
            _ => TransportError::Io(err),
        }
    }
}

/// Opens sessions to a bridge.
pub trait BridgeTransport {
    /// Connect and validate the greeting.
    fn handshake(
        &self,
        port: u16,
        timeout: Duration,
    ) -> Result<Box<dyn BridgeSession>, TransportError>;
}

/// A connection that completed the handshake.
pub trait BridgeSession {
    /// Send a ping and wait for the pong.
    fn ping(&mut self, timeout: Duration) -> Result<(), TransportError>;
}

/// TCP transport to a bridge on the local machine.
#[derive(Debug, Clone, Copy)]
pub struct TcpTransport {
    host: IpAddr,
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }
}

impl TcpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BridgeTransport for TcpTransport {
    fn handshake(
        &self,
        port: u16,
        timeout: Duration,
    ) -> Result<Box<dyn BridgeSession>, TransportError> {
        let addr = SocketAddr::new(self.host, port);
        let mut stream = TcpStream::connect_timeout(&addr, timeout)
            .map_err(|source| TransportError::Connect { port, source })?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;

        let greeting = read_greeting(&mut stream)?;
        check_greeting(&greeting)?;
        tracing::debug!("Bridge greeting on port {}: {}", port, greeting);

        Ok(Box::new(TcpSession { stream }))
    }
}

struct TcpSession {
    stream: TcpStream,
}

impl BridgeSession for TcpSession {
    fn ping(&mut self, timeout: Duration) -> Result<(), TransportError> {
        self.stream.set_read_timeout(Some(timeout))?;
        self.stream.set_write_timeout(Some(timeout))?;

        write_frame(&mut self.stream, b"ping")?;
        let reply = read_frame(&mut self.stream)?;
        let text = String::from_utf8_lossy(&reply);
        if text.contains("pong") {
            Ok(())
        } else {
            Err(TransportError::UnexpectedReply(text.into_owned()))
        }
    }
}

/// Read bytes up to the first newline.
fn read_greeting(reader: &mut impl Read) -> Result<String, TransportError> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while line.len() < MAX_GREETING_LEN {
        if reader.read(&mut byte)? == 0 {
            if line.is_empty() {
                return Err(TransportError::Closed);
            }
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        line.push(byte[0]);
    }
    Ok(String::from_utf8_lossy(&line).trim().to_string())
}

/// Validate a greeting line.
pub fn check_greeting(greeting: &str) -> Result<(), TransportError> {
    if !greeting.starts_with(GREETING_PREFIX) {
        return Err(TransportError::InvalidGreeting(greeting.to_string()));
    }
    if !greeting.split_whitespace().any(|token| token == FRAMING_TOKEN) {
        return Err(TransportError::FramingUnsupported);
    }
    Ok(())
}

/// Write one length-prefixed frame.
pub fn write_frame(writer: &mut impl Write, payload: &[u8]) -> Result<(), TransportError> {
    let len = payload.len() as u64;
    if len > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge(len));
    }
    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}

/// Read one length-prefixed frame.
pub fn read_frame(reader: &mut impl Read) -> Result<Vec<u8>, TransportError> {
    let mut header = [0u8; 8];
    reader.read_exact(&mut header)?;
    let len = u64::from_be_bytes(header);
    if len > MAX_FRAME_LEN {
        return Err(TransportError::FrameTooLarge(len));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}
