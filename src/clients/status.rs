//! Client status values.

use serde::Serialize;
use std::fmt;

/// Configuration and connection status of one external client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    NotConfigured,
    Configured,
    Running,
    Connected,
    IncorrectPath,
    CommunicationError,
    NoResponse,
}

/// Severity used to color a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTier {
    Ok,
    Warning,
    Error,
}

impl ClientStatus {
    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NotConfigured => "Not Configured",
            Self::Configured => "Configured",
            Self::Running => "Running",
            Self::Connected => "Connected",
            Self::IncorrectPath => "Incorrect Path",
            Self::CommunicationError => "Communication Error",
            Self::NoResponse => "No Response",
        }
    }

    pub fn tier(&self) -> StatusTier {
        match self {
            Self::Configured | Self::Running | Self::Connected => StatusTier::Ok,
            Self::IncorrectPath | Self::CommunicationError | Self::NoResponse => {
                StatusTier::Warning
            }
            Self::NotConfigured => StatusTier::Error,
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert_eq!(ClientStatus::default(), ClientStatus::NotConfigured);
    }

    #[test]
    fn display_names() {
        assert_eq!(ClientStatus::NotConfigured.to_string(), "Not Configured");
        assert_eq!(ClientStatus::CommunicationError.to_string(), "Communication Error");
        assert_eq!(ClientStatus::NoResponse.to_string(), "No Response");
    }

    #[test]
    fn tiers() {
        assert_eq!(ClientStatus::Connected.tier(), StatusTier::Ok);
        assert_eq!(ClientStatus::Running.tier(), StatusTier::Ok);
        assert_eq!(ClientStatus::IncorrectPath.tier(), StatusTier::Warning);
        assert_eq!(ClientStatus::NoResponse.tier(), StatusTier::Warning);
        assert_eq!(ClientStatus::NotConfigured.tier(), StatusTier::Error);
    }
}
