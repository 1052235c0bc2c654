//! Caller-facing health indicator.

use serde::Serialize;

use super::verifier::{BridgeHealth, BridgeVerificationResult};

/// How an indicator should be colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorTone {
    Ok,
    Warning,
    Error,
    Neutral,
}

/// Label and tone summarizing the bridge's health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthIndicator {
    pub label: &'static str,
    pub tone: IndicatorTone,
    pub message: Option<String>,
}

impl HealthIndicator {
    /// Nothing has been verified, or the bridge is stopped.
    pub fn unknown() -> Self {
        Self {
            label: "Unknown",
            tone: IndicatorTone::Neutral,
            message: None,
        }
    }

    /// Indicator for a verification result.
    pub fn from_result(result: &BridgeVerificationResult) -> Self {
        let (label, tone) = match result.health() {
            BridgeHealth::Healthy => ("Healthy", IndicatorTone::Ok),
            BridgeHealth::Degraded => ("Ping Failed", IndicatorTone::Warning),
            BridgeHealth::Unhealthy => ("Unhealthy", IndicatorTone::Error),
            BridgeHealth::Disconnected => ("Disconnected", IndicatorTone::Error),
        };
        Self {
            label,
            tone,
            message: Some(result.message().to_string()),
        }
    }
}

impl Default for HealthIndicator {
    fn default() -> Self {
        Self::unknown()
    }
}
