//! Wire form of the drive command and the sinks that carry it.
//!
//! The payload is ASCII text `"<x> <y>"`, each component printed with exactly
//! two decimals and a `.` decimal point, e.g. `"0.35 -0.71"`.  One datagram
//! per frame, no framing, no sequence number, no acknowledgment: a lost
//! datagram is superseded by the next frame's.

use std::fmt;
use std::net::{SocketAddrV4, UdpSocket};

use crate::curve::SpeedVector;
use crate::{Error, Result};

/// Default actuator controller address.
pub const DEFAULT_ENDPOINT: &str = "10.17.6.2:80";

// ════════════════════════════════════════════════════════════════════════════
// Command
// ════════════════════════════════════════════════════════════════════════════

/// One serialised speed vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command(String);

impl Command {
    pub fn from_speed(speed: &SpeedVector) -> Self {
        // Rust float formatting never consults the locale.
        Command(format!("{:.2} {:.2}", hundredths(speed.x), hundredths(speed.y)))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Single-byte text; the formatter only ever emits ASCII.
    pub fn as_bytes(&self) -> &[u8] { self.0.as_bytes() }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Round to two decimals, ties away from zero (`0.625` → `0.63`); `{:.2}`
/// alone rounds ties to even.  Anything that rounds to zero comes back as
/// `+0.0`, since `-0.0` would print as `"-0.00"`.
fn hundredths(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 { 0.0 } else { r }
}

// ════════════════════════════════════════════════════════════════════════════
// CommandSink — abstraction over UDP / null (for dry runs and tests)
// ════════════════════════════════════════════════════════════════════════════

/// Where commands go.  `send` is best-effort; callers log failures and move
/// on to the next frame.
pub trait CommandSink {
    fn send(&mut self, command: &Command) -> Result<()>;
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn send(&mut self, command: &Command) -> Result<()> {
        (**self).send(command)
    }
}

// ── UDP backend ───────────────────────────────────────────────────────────

/// Owned datagram socket bound once at startup and reused for every frame.
/// The socket is released when the transmitter is dropped.
#[derive(Debug)]
pub struct UdpTransmitter {
    socket:   UdpSocket,
    endpoint: SocketAddrV4,
}

impl UdpTransmitter {
    pub fn open(bind: SocketAddrV4, endpoint: SocketAddrV4) -> Result<Self> {
        let socket = UdpSocket::bind(bind)?;
        // A send must never stall the frame loop.
        socket.set_nonblocking(true)?;
        Ok(UdpTransmitter { socket, endpoint })
    }

    pub fn endpoint(&self) -> SocketAddrV4 { self.endpoint }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl CommandSink for UdpTransmitter {
    fn send(&mut self, command: &Command) -> Result<()> {
        self.socket
            .send_to(command.as_bytes(), self.endpoint)
            .map(|_| ())
            .map_err(Error::Transmit)
    }
}

// ── null backend ──────────────────────────────────────────────────────────

/// Accepts and discards every command.
#[derive(Debug, Default)]
pub struct NullSink;

impl CommandSink for NullSink {
    fn send(&mut self, _command: &Command) -> Result<()> { Ok(()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
