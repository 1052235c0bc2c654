//! Shared display helpers.
//!
//! These helpers are used by `doctor`, `status`, `bridge` and `clients` to
//! render dependency, bridge and client states consistently.

use crate::bridge::{BridgeVerificationResult, HealthIndicator, IndicatorTone};
use crate::clients::{ClientStatus, StatusTier};
use crate::dependencies::DependencyStatus;
use crate::ui::{Tone, UserInterface};

pub fn indicator_tone(tone: IndicatorTone) -> Tone {
    match tone {
        IndicatorTone::Ok => Tone::Ok,
        IndicatorTone::Warning => Tone::Warning,
        IndicatorTone::Error => Tone::Error,
        IndicatorTone::Neutral => Tone::Neutral,
    }
}

pub fn tier_tone(tier: StatusTier) -> Tone {
    match tier {
        StatusTier::Ok => Tone::Ok,
        StatusTier::Warning => Tone::Warning,
        StatusTier::Error => Tone::Error,
    }
}

/// Tone for a dependency: found is ok, a missing optional tool is a warning.
pub fn dependency_tone(status: &DependencyStatus) -> Tone {
    if status.is_available {
        Tone::Ok
    } else if status.is_required {
        Tone::Error
    } else {
        Tone::Warning
    }
}

/// Print one dependency, with its details in verbose mode.
pub fn show_dependency(ui: &mut dyn UserInterface, status: &DependencyStatus) {
    ui.show_status(dependency_tone(status), &status.summary(), None);

    if ui.output_mode().shows_details() {
        if let Some(details) = &status.details {
            ui.show_detail("Details", details);
        }
    }
    if !status.is_available && !status.installation_hint.is_empty() {
        ui.show_detail("Install", &status.installation_hint);
    }
}

/// Print the bridge health line for a verification result.
pub fn show_bridge_health(ui: &mut dyn UserInterface, result: &BridgeVerificationResult) {
    let indicator = HealthIndicator::from_result(result);
    ui.show_status(
        indicator_tone(indicator.tone),
        &format!("Bridge: {}", indicator.label),
        indicator.message.as_deref(),
    );
}

/// Print a client status line.
pub fn show_client_status(ui: &mut dyn UserInterface, name: &str, status: ClientStatus) {
    ui.show_status(tier_tone(status.tier()), &format!("{}: {}", name, status), None);
}
