//! Version parsing and the minimum-version gate.
//!
//! Tools report versions as dotted integers (`3.12.1`). A [`Version`] keeps
//! the major, minor and optional patch component; anything after the patch is
//! ignored. [`Version::is_acceptable`] implements the interpreter gate:
//! Python 3.10 or later, where any future major version is always accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minimum supported interpreter version, as `(major, minor)`.
pub const MIN_INTERPRETER_VERSION: (u32, u32) = (3, 10);

/// A parsed tool version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

/// Why a version string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,

    #[error("version '{0}' has no minor component")]
    MissingMinor(String),

    #[error("version component '{component}' in '{input}' is not a number")]
    NonNumeric { input: String, component: String },
}

impl Version {
    /// Create a version without a patch component.
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Create a version with a patch component.
    pub fn with_patch(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// Parse a dotted-integer version string.
    ///
    /// At least a major and minor component are required. Components beyond
    /// the patch are ignored.
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let input = text.trim();
        if input.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut parts = input.split('.');
        let numeric = |component: &str| -> Result<u32, VersionParseError> {
            component
                .parse::<u32>()
                .map_err(|_| VersionParseError::NonNumeric {
                    input: input.to_string(),
                    component: component.to_string(),
                })
        };

        // split always yields at least one item
        let major = numeric(parts.next().unwrap_or_default())?;
        let minor = match parts.next() {
            Some(minor) => numeric(minor)?,
            None => return Err(VersionParseError::MissingMinor(input.to_string())),
        };
        let patch = parts.next().map(numeric).transpose()?;

        Ok(Self {
            major,
            minor,
            patch,
        })
    }

    /// Whether this version passes the interpreter gate.
    ///
    /// Accepted iff `major > 3`, or `major == 3 && minor >= 10`. A future
    /// major version is accepted regardless of its minor component.
    pub fn is_acceptable(&self) -> bool {
        let (min_major, min_minor) = MIN_INTERPRETER_VERSION;
        self.major > min_major || (self.major == min_major && self.minor >= min_minor)
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// Which versions a tool accepts once its output has been parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Apply the interpreter gate ([`Version::is_acceptable`]).
    MinimumInterpreter,
    /// Any version that parses is fine.
    AnyParsable,
}

impl VersionPolicy {
    /// Check a parsed version against this policy.
    pub fn accepts(&self, version: &Version) -> bool {
        match self {
            Self::MinimumInterpreter => version.is_acceptable(),
            Self::AnyParsable => true,
        }
    }

    /// Human description used in "not found" messages.
    pub fn describe(&self) -> String {
        match self {
            Self::MinimumInterpreter => {
                let (major, minor) = MIN_INTERPRETER_VERSION;
                format!("{}.{} or later", major, minor)
            }
            Self::AnyParsable => "any version".to_string(),
        }
    }
}

/// Parse and gate in one step; parse failures are treated as rejection.
pub fn is_acceptable_str(text: &str) -> bool {
    Version::parse(text)
        .map(|v| v.is_acceptable())
        .unwrap_or(false)
}
