//! Instrumented bridge doubles shared by unit tests.

use std::cell::Cell;
use std::io::{self, Write};
use std::net::TcpListener;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use super::lifecycle::{BridgeLauncher, BridgeProcess, BridgeStatus};
use super::transport::{read_frame, write_frame, BridgeSession, BridgeTransport, TransportError};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct Calls {
    pub handshakes: Cell<usize>,
    pub pings: Cell<usize>,
}

/// Transport whose handshake and ping outcomes are fixed up front.
pub struct ScriptedTransport {
    calls: Rc<Calls>,
    handshake_ok: bool,
    ping_ok: bool,
}

impl ScriptedTransport {
    pub fn new(handshake_ok: bool, ping_ok: bool) -> (Self, Rc<Calls>) {
        let calls = Rc::new(Calls::default());
        (
            Self {
                calls: calls.clone(),
                handshake_ok,
                ping_ok,
            },
            calls,
        )
    }
}

struct ScriptedSession {
    calls: Rc<Calls>,
    ping_ok: bool,
}

impl BridgeTransport for ScriptedTransport {
    fn handshake(
        &self,
        _port: u16,
        _timeout: Duration,
    ) -> std::result::Result<Box<dyn BridgeSession>, TransportError> {
        self.calls.handshakes.set(self.calls.handshakes.get() + 1);
        if !self.handshake_ok {
            return Err(TransportError::InvalidGreeting("garbage".into()));
        }
        Ok(Box::new(ScriptedSession {
            calls: self.calls.clone(),
            ping_ok: self.ping_ok,
        }))
    }
}

impl BridgeSession for ScriptedSession {
    fn ping(&mut self, _timeout: Duration) -> std::result::Result<(), TransportError> {
        self.calls.pings.set(self.calls.pings.get() + 1);
        if self.ping_ok {
            Ok(())
        } else {
            Err(TransportError::Timeout)
        }
    }
}

/// Bridge whose running state is set directly.
pub struct FixedBridge {
    pub running: bool,
    pub port: u16,
}

impl BridgeStatus for FixedBridge {
    fn is_running(&mut self) -> bool {
        self.running
    }

    fn current_port(&self) -> u16 {
        self.port
    }
}

/// Shared state of a [`FakeLauncher`] and the processes it spawns.
#[derive(Debug, Default)]
pub struct ProcessState {
    pub launches: Cell<usize>,
    pub terminations: Cell<usize>,
    pub exited: Cell<bool>,
}

/// Launcher that spawns nothing and counts calls.
pub struct FakeLauncher(pub Rc<ProcessState>);

struct FakeProcess(Rc<ProcessState>);

impl BridgeLauncher for FakeLauncher {
    fn launch(&self, _port: u16) -> Result<Box<dyn BridgeProcess>> {
        self.0.launches.set(self.0.launches.get() + 1);
        self.0.exited.set(false);
        Ok(Box::new(FakeProcess(self.0.clone())))
    }
}

impl BridgeProcess for FakeProcess {
    fn id(&self) -> u32 {
        4242
    }

    fn has_exited(&mut self) -> io::Result<bool> {
        Ok(self.0.exited.get())
    }

    fn terminate(&mut self, _grace: Duration) -> io::Result<()> {
        self.0.terminations.set(self.0.terminations.get() + 1);
        self.0.exited.set(true);
        Ok(())
    }
}

/// Listen on an ephemeral port and answer like a bridge for `connections`
/// connections, then close the listener.
///
/// Every connection gets the greeting; connections that send a ping frame
/// get a pong. Port probes that hang up immediately are tolerated.
pub fn spawn_fake_bridge(connections: usize) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().take(connections) {
            let Ok(mut stream) = stream else { continue };
            if stream
                .write_all(b"WELCOME UNITY-MCP 1 FRAMING=1\n")
                .is_err()
            {
                continue;
            }
            if let Ok(request) = read_frame(&mut stream) {
                if request == b"ping" {
                    let _ = write_frame(
                        &mut stream,
                        br#"{"status":"success","result":{"message":"pong"}}"#,
                    );
                }
            }
        }
    });
    port
}

/// A port nothing listens on.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
