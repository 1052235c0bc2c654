//! Companion bridge process management.
//!
//! - Spawning, attaching and stopping in [`lifecycle`]
//! - The handshake/ping client in [`transport`]
//! - Tiered verification in [`verifier`]
//! - The caller-facing indicator in [`health`]
//! - Tick-driven supervision in [`supervisor`]

pub mod health;
pub mod lifecycle;
pub mod supervisor;
pub mod transport;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use health::{HealthIndicator, IndicatorTone};
pub use lifecycle::{
    BridgeLauncher, BridgeManager, BridgeOptions, BridgeProcess, BridgeStatus, CommandLauncher,
    StartOutcome, StopOutcome, DEFAULT_PORT,
};
pub use supervisor::{BridgeSupervisor, FollowUp, TickReport, ToggleOutcome};
pub use transport::{BridgeSession, BridgeTransport, TcpTransport, TransportError};
pub use verifier::{BridgeHealth, BridgeVerificationResult, BridgeVerifier};
