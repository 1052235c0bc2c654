//! Bridge process lifecycle.
//!
//! [`BridgeManager`] owns the companion bridge process. It either spawns the
//! process through a [`BridgeLauncher`] or attaches to one that is already
//! listening on the configured port. Start and Stop are idempotent.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, ToolbridgeError};

/// Default port the bridge listens on.
pub const DEFAULT_PORT: u16 = 6400;

/// Environment variable carrying the port to a spawned bridge.
pub const PORT_ENV_VAR: &str = "TOOLBRIDGE_PORT";

/// Placeholder replaced with the port in launcher arguments.
const PORT_PLACEHOLDER: &str = "{port}";

/// How long a terminated bridge gets to exit before it is killed.
const TERMINATE_GRACE: Duration = Duration::from_secs(3);

/// Timeout for the attach-mode liveness probe.
const ATTACH_PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// How the manager finds its bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Port the bridge listens on.
    pub port: u16,
    /// Attach to a bridge already listening on `port` instead of spawning.
    pub attach_existing: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            attach_existing: true,
        }
    }
}

/// A spawned bridge process.
pub trait BridgeProcess {
    /// OS process id.
    fn id(&self) -> u32;

    /// Whether the process has exited.
    fn has_exited(&mut self) -> io::Result<bool>;

    /// Ask the process to exit, killing it after `grace`.
    fn terminate(&mut self, grace: Duration) -> io::Result<()>;
}

/// Spawns bridge processes.
pub trait BridgeLauncher {
    /// Start a bridge listening on `port`.
    fn launch(&self, port: u16) -> Result<Box<dyn BridgeProcess>>;
}

/// Launches `program args...` as the bridge.
///
/// Any argument equal to or containing `{port}` has it replaced with the
/// port, and `TOOLBRIDGE_PORT` is set in the child's environment.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Arguments with the port substituted.
    pub fn resolved_args(&self, port: u16) -> Vec<String> {
        let port = port.to_string();
        self.args
            .iter()
            .map(|a| a.replace(PORT_PLACEHOLDER, &port))
            .collect()
    }
}

impl BridgeLauncher for CommandLauncher {
    fn launch(&self, port: u16) -> Result<Box<dyn BridgeProcess>> {
        let child = Command::new(&self.program)
            .args(self.resolved_args(port))
            .env(PORT_ENV_VAR, port.to_string())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| ToolbridgeError::BridgeLaunchFailed {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(Box::new(ChildProcess { child }))
    }
}

/// [`BridgeProcess`] backed by a real child process.
struct ChildProcess {
    child: Child,
}

impl BridgeProcess for ChildProcess {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn has_exited(&mut self) -> io::Result<bool> {
        Ok(self.child.try_wait()?.is_some())
    }

    fn terminate(&mut self, grace: Duration) -> io::Result<()> {
        if self.has_exited()? {
            return Ok(());
        }

        request_exit(&self.child);

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if self.has_exited()? {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(50));
        }

        tracing::warn!("Bridge (pid {}) ignored termination, killing it", self.child.id());
        self.child.kill()?;
        self.child.wait()?;
        Ok(())
    }
}

#[cfg(unix)]
fn request_exit(child: &Child) {
    let Ok(pid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: kill(2) has no memory-safety preconditions; the pid belongs to
    // a child we have not reaped yet.
    unsafe {
        libc::kill(pid, libc::SIGTERM);
    }
}

#[cfg(not(unix))]
fn request_exit(_child: &Child) {}

enum BridgeState {
    Stopped,
    Attached,
    Spawned(Box<dyn BridgeProcess>),
}

/// What [`BridgeManager::start`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The bridge was already running.
    AlreadyRunning,
    /// An existing bridge was found on the port.
    Attached,
    /// A new bridge process was spawned.
    Spawned { pid: u32 },
}

/// What [`BridgeManager::stop`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Nothing was running.
    AlreadyStopped,
    /// An attached bridge was released; it keeps running.
    Detached,
    /// The spawned process was terminated.
    Terminated,
}

/// Running state and port, as seen by verification and status tracking.
pub trait BridgeStatus {
    /// Whether the bridge is running. May poll.
    fn is_running(&mut self) -> bool;

    /// Port the bridge listens on.
    fn current_port(&self) -> u16;
}

/// Owns the bridge process.
pub struct BridgeManager {
    launcher: Option<Box<dyn BridgeLauncher>>,
    options: BridgeOptions,
    state: BridgeState,
}

impl BridgeManager {
    /// A manager that can spawn the bridge.
    pub fn new(launcher: Box<dyn BridgeLauncher>, options: BridgeOptions) -> Self {
        Self {
            launcher: Some(launcher),
            options,
            state: BridgeState::Stopped,
        }
    }

    /// A manager that can only attach to an already running bridge.
    pub fn attach_only(port: u16) -> Self {
        Self {
            launcher: None,
            options: BridgeOptions {
                port,
                attach_existing: true,
            },
            state: BridgeState::Stopped,
        }
    }

    /// Start the bridge. Does nothing if it is already running.
    pub fn start(&mut self) -> Result<StartOutcome> {
        if self.is_running() {
            tracing::debug!("Bridge already running on port {}", self.options.port);
            return Ok(StartOutcome::AlreadyRunning);
        }

        if self.options.attach_existing && port_accepts_connections(self.options.port) {
            tracing::info!("Attached to bridge on port {}", self.options.port);
            self.state = BridgeState::Attached;
            return Ok(StartOutcome::Attached);
        }

        let Some(launcher) = &self.launcher else {
            return Err(ToolbridgeError::BridgeLaunchFailed {
                program: "bridge".to_string(),
                message: format!(
                    "nothing is listening on port {} and no bridge command is configured",
                    self.options.port
                ),
            });
        };

        let process = launcher.launch(self.options.port)?;
        let pid = process.id();
        tracing::info!("Started bridge (pid {}) on port {}", pid, self.options.port);
        self.state = BridgeState::Spawned(process);
        Ok(StartOutcome::Spawned { pid })
    }

    /// Stop the bridge. Does nothing if it is already stopped.
    pub fn stop(&mut self) -> Result<StopOutcome> {
        match std::mem::replace(&mut self.state, BridgeState::Stopped) {
            BridgeState::Stopped => Ok(StopOutcome::AlreadyStopped),
            BridgeState::Attached => {
                tracing::info!("Detached from bridge on port {}", self.options.port);
                Ok(StopOutcome::Detached)
            }
            BridgeState::Spawned(mut process) => {
                let pid = process.id();
                process.terminate(TERMINATE_GRACE)?;
                tracing::info!("Stopped bridge (pid {})", pid);
                Ok(StopOutcome::Terminated)
            }
        }
    }

    /// Whether the bridge is running.
    ///
    /// A spawned bridge that has exited, or an attached bridge that no longer
    /// accepts connections, moves the manager back to stopped.
    pub fn is_running(&mut self) -> bool {
        let alive = match &mut self.state {
            BridgeState::Stopped => return false,
            BridgeState::Attached => port_accepts_connections(self.options.port),
            BridgeState::Spawned(process) => match process.has_exited() {
                Ok(exited) => !exited,
                Err(e) => {
                    tracing::warn!("Could not poll bridge process: {}", e);
                    false
                }
            },
        };

        if !alive {
            tracing::info!("Bridge on port {} is no longer running", self.options.port);
            self.state = BridgeState::Stopped;
        }
        alive
    }

    /// Port the bridge listens on.
    pub fn current_port(&self) -> u16 {
        self.options.port
    }

    /// Pid of the spawned bridge, if this manager spawned one.
    pub fn pid(&self) -> Option<u32> {
        match &self.state {
            BridgeState::Spawned(process) => Some(process.id()),
            _ => None,
        }
    }

    /// Whether the running bridge was attached rather than spawned.
    pub fn is_attached(&self) -> bool {
        matches!(self.state, BridgeState::Attached)
    }
}

impl BridgeStatus for BridgeManager {
    fn is_running(&mut self) -> bool {
        BridgeManager::is_running(self)
    }

    fn current_port(&self) -> u16 {
        BridgeManager::current_port(self)
    }
}

impl Drop for BridgeManager {
    fn drop(&mut self) {
        if let BridgeState::Spawned(process) = &mut self.state {
            if let Err(e) = process.terminate(TERMINATE_GRACE) {
                tracing::warn!("Failed to stop bridge on shutdown: {}", e);
            }
        }
    }
}

/// Whether something on localhost accepts connections on `port`.
pub fn port_accepts_connections(port: u16) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpStream::connect_timeout(&addr, ATTACH_PROBE_TIMEOUT).is_ok()
}
