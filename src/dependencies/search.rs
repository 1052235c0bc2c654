//! Ordered search-then-validate detection.
//!
//! Every tool is found the same way:
//!
//! 1. An explicit override is validated and returned as-is, with no fallback.
//! 2. Each search-path name is resolved in order; the first hit that
//!    validates wins.
//! 3. The fixed candidate list is tried in order; the first hit that
//!    validates wins.
//! 4. Otherwise the tool is reported missing.
//!
//! A candidate validates when `<path> --version` exits 0 within the version
//! timeout, its first output line starts with the product prefix, and the
//! version that follows satisfies the tool's [`VersionPolicy`].

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::overrides::{PathOverrideKind, PathOverrideStore};
use super::probe::{first_line, ProcessRunner};
use super::status::DependencyStatus;
use super::version::{Version, VersionPolicy};

/// Upper bounds for the two kinds of probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTimeouts {
    /// Search-path resolution (`which`/`where`).
    pub search: Duration,
    /// `--version` validation.
    pub version: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            search: Duration::from_secs(3),
            version: Duration::from_secs(5),
        }
    }
}

/// Everything detection needs from the outside world.
pub struct DetectionContext<'a> {
    /// Runs probes.
    pub runner: &'a dyn ProcessRunner,
    /// User overrides, consulted before auto-detection.
    pub overrides: &'a PathOverrideStore,
    /// Probe bounds.
    pub timeouts: ProbeTimeouts,
}

impl<'a> DetectionContext<'a> {
    /// Create a context with default timeouts.
    pub fn new(runner: &'a dyn ProcessRunner, overrides: &'a PathOverrideStore) -> Self {
        Self {
            runner,
            overrides,
            timeouts: ProbeTimeouts::default(),
        }
    }

    /// Replace the probe timeouts.
    pub fn with_timeouts(mut self, timeouts: ProbeTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

/// How to find and validate one tool.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Display name (e.g., "Python").
    pub name: &'static str,
    /// Override consulted first.
    pub override_kind: PathOverrideKind,
    /// Whether the tool-server needs it.
    pub is_required: bool,
    /// Names resolved through the search path, in preference order.
    pub search_names: &'static [&'static str],
    /// Well-known install locations, in preference order.
    pub candidates: Vec<PathBuf>,
    /// Expected start of the `--version` line, if any.
    pub version_prefix: Option<&'static str>,
    /// Which parsed versions are acceptable.
    pub policy: VersionPolicy,
    /// Where to get the tool.
    pub install_hint: String,
    /// Error reported when nothing validates.
    pub missing_message: String,
    /// Detail reported when nothing validates.
    pub missing_details: Option<String>,
}

/// Detect one tool.
///
/// Never fails: unexpected probe errors are recorded in the status's
/// `error_message`.
pub fn detect_tool(spec: &ToolSpec, ctx: &DetectionContext<'_>) -> DependencyStatus {
    let mut status =
        DependencyStatus::new(spec.name, spec.is_required).with_hint(spec.install_hint.clone());

    if let Err(e) = search(spec, ctx, &mut status) {
        tracing::error!("Error detecting {}: {}", spec.name, e);
        status.mark_missing(format!("Error detecting {}: {}", spec.name, e), None);
    }

    status
}

fn search(
    spec: &ToolSpec,
    ctx: &DetectionContext<'_>,
    status: &mut DependencyStatus,
) -> io::Result<()> {
    if let Some(path) = ctx.overrides.get(spec.override_kind) {
        match validate_candidate(spec, ctx, path)? {
            Some(version) => {
                tracing::info!("Using {} override {} ({})", spec.name, path.display(), version);
                status.mark_found(
                    version,
                    path,
                    format!("Using {} {} from override {}", spec.name, version, path.display()),
                );
            }
            None => {
                tracing::warn!("{} override {} did not validate", spec.name, path.display());
                status.mark_missing(
                    format!(
                        "{} override at {} is not a working {} {}",
                        spec.name,
                        path.display(),
                        spec.name,
                        spec.policy.describe()
                    ),
                    Some("Clear the override to fall back to automatic detection.".to_string()),
                );
            }
        }
        return Ok(());
    }

    for name in spec.search_names {
        let Some(path) = ctx.runner.find_on_search_path(name, ctx.timeouts.search)? else {
            continue;
        };

        if let Some(version) = validate_candidate(spec, ctx, &path)? {
            tracing::info!("Found {} {} at {}", spec.name, version, path.display());
            status.mark_found(
                version,
                &path,
                format!("Found {} {} in PATH", spec.name, version),
            );
            return Ok(());
        }
    }

    for candidate in &spec.candidates {
        if let Some(version) = validate_candidate(spec, ctx, candidate)? {
            tracing::info!("Found {} {} at {}", spec.name, version, candidate.display());
            status.mark_found(
                version,
                candidate,
                format!("Found {} {} at {}", spec.name, version, candidate.display()),
            );
            return Ok(());
        }
    }

    tracing::debug!(
        "{} not found after {} search name(s) and {} candidate(s)",
        spec.name,
        spec.search_names.len(),
        spec.candidates.len()
    );
    status.mark_missing(spec.missing_message.clone(), spec.missing_details.clone());
    Ok(())
}

/// Probe one path and return its version if it is acceptable.
///
/// `Ok(None)` means the candidate was disqualified; `Err` is reserved for
/// unexpected OS failures.
pub fn validate_candidate(
    spec: &ToolSpec,
    ctx: &DetectionContext<'_>,
    path: &Path,
) -> io::Result<Option<Version>> {
    let output = ctx.runner.run(path, &["--version"], ctx.timeouts.version)?;
    if !output.succeeded() {
        tracing::debug!("{}: --version did not succeed", path.display());
        return Ok(None);
    }

    let Some(version) = parse_version_line(&output.stdout, spec.version_prefix) else {
        tracing::debug!(
            "{}: unrecognised version output {:?}",
            path.display(),
            output.stdout.trim()
        );
        return Ok(None);
    };

    if !spec.policy.accepts(&version) {
        tracing::debug!(
            "{}: {} {} is too old, need {}",
            path.display(),
            spec.name,
            version,
            spec.policy.describe()
        );
        return Ok(None);
    }

    Ok(Some(version))
}

/// Extract the version from `--version` output.
///
/// The first non-empty line must start with `prefix`; the first whitespace
/// separated token after it is parsed.
pub fn parse_version_line(stdout: &str, prefix: Option<&str>) -> Option<Version> {
    let line = first_line(stdout)?;
    let rest = match prefix {
        Some(prefix) => line.strip_prefix(prefix)?,
        None => line,
    };
    let token = rest.split_whitespace().next()?;
    Version::parse(token).ok()
}
