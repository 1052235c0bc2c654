//! Bounded subprocess probing.
//!
//! Every external program toolbridge looks at (`python --version`,
//! `which uv`, ...) is run through a [`ProcessRunner`]. A probe never blocks
//! past its timeout and never treats "the executable isn't there" as an
//! error: missing files, permission problems and non-executable files all
//! come back as a [`ProbeOutput`] with `started == false`. Only unexpected OS
//! failures surface as `Err`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use toolbridge::dependencies::probe::{ProcessRunner, SystemRunner};
//!
//! let runner = SystemRunner;
//! let out = runner
//!     .run(Path::new("python3"), &["--version"], Duration::from_secs(5))
//!     .unwrap();
//! if out.succeeded() {
//!     println!("{}", out.stdout.trim());
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// How often a running probe is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of running a probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOutput {
    /// Whether the process could be started at all.
    pub started: bool,
    /// Whether the process exited before the timeout.
    pub completed: bool,
    /// Exit code (None if not started, timed out, or killed by a signal).
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
}

impl ProbeOutput {
    /// The executable could not be started.
    pub fn not_started() -> Self {
        Self::default()
    }

    /// The process was started but did not finish in time.
    pub fn timed_out() -> Self {
        Self {
            started: true,
            ..Self::default()
        }
    }

    /// A completed run.
    pub fn exited(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            started: true,
            completed: true,
            exit_code: Some(exit_code),
            stdout: stdout.into(),
        }
    }

    /// Started, finished in time, and exited with code 0.
    pub fn succeeded(&self) -> bool {
        self.started && self.completed && self.exit_code == Some(0)
    }
}

/// Runs external programs with a bounded wait.
pub trait ProcessRunner {
    /// Run `program` with `args`, capturing standard output only.
    fn run(&self, program: &Path, args: &[&str], timeout: Duration) -> io::Result<ProbeOutput>;

    /// Resolve an executable name through the platform's search-path command.
    ///
    /// Returns the first non-empty line of output. The file is not re-checked
    /// for existence: Windows execution aliases are not ordinary files.
    fn find_on_search_path(&self, name: &str, timeout: Duration) -> io::Result<Option<PathBuf>> {
        let output = self.run(Path::new(search_path_command()), &[name], timeout)?;
        if !output.succeeded() {
            return Ok(None);
        }
        Ok(first_line(&output.stdout).map(PathBuf::from))
    }
}

/// The native "locate on PATH" command for this host.
pub fn search_path_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    }
}

/// First non-empty line of `text`, split on `\r` and `\n`.
pub fn first_line(text: &str) -> Option<&str> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .find(|line| !line.is_empty())
}

/// Whether a spawn error just means "there is nothing runnable here".
fn is_expected_absence(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied | io::ErrorKind::InvalidInput
    ) {
        return true;
    }

    is_bad_executable_format(err)
}

#[cfg(unix)]
fn is_bad_executable_format(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ENOEXEC)
}

#[cfg(windows)]
fn is_bad_executable_format(err: &io::Error) -> bool {
    // ERROR_BAD_EXE_FORMAT
    err.raw_os_error() == Some(193)
}

#[cfg(not(any(unix, windows)))]
fn is_bad_executable_format(_err: &io::Error) -> bool {
    false
}

/// Run probes without flashing a console window on Windows.
#[cfg(target_os = "windows")]
fn no_window(cmd: &mut Command) -> &mut Command {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x08000000;
    cmd.creation_flags(CREATE_NO_WINDOW)
}

#[cfg(not(target_os = "windows"))]
fn no_window(cmd: &mut Command) -> &mut Command {
    cmd
}

/// [`ProcessRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str], timeout: Duration) -> io::Result<ProbeOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        no_window(&mut cmd);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if is_expected_absence(&e) => {
                tracing::debug!("Could not start {}: {}", program.display(), e);
                return Ok(ProbeOutput::not_started());
            }
            Err(e) => return Err(e),
        };

        // Drain stdout on a separate thread so a chatty child can't fill the
        // pipe and stall before exiting.
        let (tx, rx) = mpsc::channel();
        if let Some(mut stdout) = child.stdout.take() {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stdout.read_to_end(&mut buf);
                let _ = tx.send(buf);
            });
        }

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break Some(status),
                None if Instant::now() >= deadline => break None,
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let Some(status) = status else {
            tracing::debug!(
                "{} did not finish within {:?}, killing it",
                program.display(),
                timeout
            );
            let _ = child.kill();
            let _ = child.wait();
            return Ok(ProbeOutput::timed_out());
        };

        // A grandchild may still hold the pipe open; don't wait on it forever.
        let grace = deadline
            .saturating_duration_since(Instant::now())
            .max(Duration::from_millis(100));
        let stdout = rx.recv_timeout(grace).unwrap_or_default();

        Ok(ProbeOutput {
            started: true,
            completed: true,
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
        })
    }
}

/// A probe recorded by [`ScriptedRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeCall {
    /// `program args...` was run.
    Run { program: PathBuf, args: Vec<String> },
    /// A search-path lookup for `name`.
    Search { name: String },
}

/// Deterministic [`ProcessRunner`] for tests.
///
/// Responses are keyed by program path; anything unscripted behaves like a
/// missing executable. Every call is recorded so tests can assert which
/// candidates were (or were not) probed.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outputs: HashMap<PathBuf, ProbeOutput>,
    failures: HashMap<PathBuf, String>,
    search_results: HashMap<String, PathBuf>,
    calls: RefCell<Vec<ProbeCall>>,
}

impl ScriptedRunner {
    /// Create a runner where nothing exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` print `stdout` and exit 0.
    pub fn with_output(mut self, program: impl Into<PathBuf>, stdout: &str) -> Self {
        self.outputs
            .insert(program.into(), ProbeOutput::exited(0, stdout));
        self
    }

    /// Make `program` respond with an arbitrary probe result.
    pub fn with_probe(mut self, program: impl Into<PathBuf>, output: ProbeOutput) -> Self {
        self.outputs.insert(program.into(), output);
        self
    }

    /// Make `program` fail with an unexpected OS error.
    pub fn with_failure(mut self, program: impl Into<PathBuf>, message: &str) -> Self {
        self.failures.insert(program.into(), message.to_string());
        self
    }

    /// Make a search-path lookup for `name` resolve to `path`.
    pub fn with_search_result(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.search_results.insert(name.to_string(), path.into());
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<ProbeCall> {
        self.calls.borrow().clone()
    }

    /// Number of `run` calls (version probes).
    pub fn run_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, ProbeCall::Run { .. }))
            .count()
    }

    /// Number of search-path lookups.
    pub fn search_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, ProbeCall::Search { .. }))
            .count()
    }

    /// Whether `program` was run.
    pub fn was_run(&self, program: &Path) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| matches!(c, ProbeCall::Run { program: p, .. } if p == program))
    }

    /// Whether a search-path lookup for `name` happened.
    pub fn was_searched(&self, name: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| matches!(c, ProbeCall::Search { name: n } if n == name))
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, program: &Path, args: &[&str], _timeout: Duration) -> io::Result<ProbeOutput> {
        self.calls.borrow_mut().push(ProbeCall::Run {
            program: program.to_path_buf(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        if let Some(message) = self.failures.get(program) {
            return Err(io::Error::other(message.clone()));
        }

        Ok(self
            .outputs
            .get(program)
            .cloned()
            .unwrap_or_else(ProbeOutput::not_started))
    }

    fn find_on_search_path(&self, name: &str, _timeout: Duration) -> io::Result<Option<PathBuf>> {
        self.calls.borrow_mut().push(ProbeCall::Search {
            name: name.to_string(),
        });
        Ok(self.search_results.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_skips_blank_lines() {
        assert_eq!(
            first_line("\r\n\nC:\\Python\\python.exe\r\nD:\\x"),
            Some("C:\\Python\\python.exe")
        );
        assert_eq!(first_line("   \n"), None);
        assert_eq!(first_line(""), None);
    }

    #[test]
    fn probe_output_succeeded_requires_zero_exit() {
        assert!(ProbeOutput::exited(0, "ok").succeeded());
        assert!(!ProbeOutput::exited(1, "").succeeded());
        assert!(!ProbeOutput::timed_out().succeeded());
        assert!(!ProbeOutput::not_started().succeeded());
    }

    #[test]
    fn missing_executable_is_not_started_not_error() {
        let out = SystemRunner
            .run(
                Path::new("/definitely/not/here/python3"),
                &["--version"],
                Duration::from_secs(2),
            )
            .unwrap();
        assert!(!out.started);
        assert!(!out.completed);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn captures_stdout_and_exit_code() {
            let temp = TempDir::new().unwrap();
            let exe = script(temp.path(), "fake", "echo \"Python 3.12.1\"");

            let out = SystemRunner
                .run(&exe, &["--version"], Duration::from_secs(5))
                .unwrap();
            assert!(out.succeeded());
            assert_eq!(out.stdout.trim(), "Python 3.12.1");
        }

        #[test]
        fn stderr_is_discarded() {
            let temp = TempDir::new().unwrap();
            let exe = script(temp.path(), "noisy", "echo oops >&2\necho fine");

            let out = SystemRunner.run(&exe, &[], Duration::from_secs(5)).unwrap();
            assert_eq!(out.stdout.trim(), "fine");
        }

        #[test]
        fn nonzero_exit_is_reported() {
            let temp = TempDir::new().unwrap();
            let exe = script(temp.path(), "failing", "exit 3");

            let out = SystemRunner.run(&exe, &[], Duration::from_secs(5)).unwrap();
            assert!(out.completed);
            assert_eq!(out.exit_code, Some(3));
            assert!(!out.succeeded());
        }

        #[test]
        fn hung_process_times_out() {
            let temp = TempDir::new().unwrap();
            let exe = script(temp.path(), "hang", "exec sleep 30");

            let start = Instant::now();
            let out = SystemRunner
                .run(&exe, &["--version"], Duration::from_millis(300))
                .unwrap();
            assert!(out.started);
            assert!(!out.completed);
            assert!(start.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn non_executable_file_is_not_started() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("plain");
            fs::write(&path, "not a program").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

            let out = SystemRunner.run(&path, &[], Duration::from_secs(2)).unwrap();
            assert!(!out.started);
        }
    }

    #[test]
    fn scripted_runner_records_calls() {
        let runner = ScriptedRunner::new()
            .with_output("/usr/bin/python3", "Python 3.12.0")
            .with_search_result("python3", "/usr/bin/python3");

        let found = runner
            .find_on_search_path("python3", Duration::from_secs(1))
            .unwrap();
        assert_eq!(found, Some(PathBuf::from("/usr/bin/python3")));

        let out = runner
            .run(Path::new("/usr/bin/python3"), &["--version"], Duration::from_secs(1))
            .unwrap();
        assert_eq!(out.stdout, "Python 3.12.0");

        assert_eq!(runner.search_count(), 1);
        assert_eq!(runner.run_count(), 1);
        assert!(runner.was_run(Path::new("/usr/bin/python3")));
        assert!(runner.was_searched("python3"));
    }

    #[test]
    fn scripted_runner_unknown_program_is_not_started() {
        let runner = ScriptedRunner::new();
        let out = runner
            .run(Path::new("/nope"), &["--version"], Duration::from_secs(1))
            .unwrap();
        assert!(!out.started);
    }

    #[test]
    fn scripted_runner_failure_is_error() {
        let runner = ScriptedRunner::new().with_failure("/broken", "pipe creation failed");
        let err = runner
            .run(Path::new("/broken"), &[], Duration::from_secs(1))
            .unwrap_err();
        assert!(err.to_string().contains("pipe creation failed"));
    }
}
