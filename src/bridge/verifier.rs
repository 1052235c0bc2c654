//! Two-step bridge verification.
//!
//! Verification first performs the handshake, then pings over the resulting
//! session. The outcome is folded into a [`BridgeVerificationResult`] whose
//! [`BridgeHealth`] tier tells a failed handshake (unhealthy) apart from a
//! failed ping (degraded).

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use super::lifecycle::BridgeStatus;
use super::transport::{BridgeTransport, TcpTransport};

/// Health tier derived from a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeHealth {
    /// Handshake and ping both succeeded.
    Healthy,
    /// Handshake succeeded, ping failed.
    Degraded,
    /// Handshake failed.
    Unhealthy,
    /// The bridge is not running.
    Disconnected,
}

impl fmt::Display for BridgeHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
            Self::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

/// Outcome of [`BridgeVerifier::verify`].
///
/// Results are only built through the constructors below, so a successful
/// ping always implies a valid handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeVerificationResult {
    success: bool,
    handshake_valid: bool,
    ping_succeeded: bool,
    message: String,
    health: BridgeHealth,
}

impl BridgeVerificationResult {
    pub fn disconnected() -> Self {
        Self {
            success: false,
            handshake_valid: false,
            ping_succeeded: false,
            message: "Bridge is not running".to_string(),
            health: BridgeHealth::Disconnected,
        }
    }

    pub fn handshake_failed(reason: impl fmt::Display) -> Self {
        Self {
            success: false,
            handshake_valid: false,
            ping_succeeded: false,
            message: format!("Handshake failed: {}", reason),
            health: BridgeHealth::Unhealthy,
        }
    }

    pub fn ping_failed(reason: impl fmt::Display) -> Self {
        Self {
            success: false,
            handshake_valid: true,
            ping_succeeded: false,
            message: format!("Ping failed: {}", reason),
            health: BridgeHealth::Degraded,
        }
    }

    pub fn healthy() -> Self {
        Self {
            success: true,
            handshake_valid: true,
            ping_succeeded: true,
            message: "Bridge is healthy".to_string(),
            health: BridgeHealth::Healthy,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn handshake_valid(&self) -> bool {
        self.handshake_valid
    }

    pub fn ping_succeeded(&self) -> bool {
        self.ping_succeeded
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn health(&self) -> BridgeHealth {
        self.health
    }
}

/// Runs handshake-then-ping against a bridge.
pub struct BridgeVerifier {
    transport: Box<dyn BridgeTransport>,
    handshake_timeout: Duration,
    ping_timeout: Duration,
}

impl Default for BridgeVerifier {
    fn default() -> Self {
        Self::new(Box::new(TcpTransport::new()))
    }
}

impl BridgeVerifier {
    pub fn new(transport: Box<dyn BridgeTransport>) -> Self {
        Self {
            transport,
            handshake_timeout: Duration::from_secs(1),
            ping_timeout: Duration::from_secs(1),
        }
    }

    pub fn with_timeouts(mut self, handshake: Duration, ping: Duration) -> Self {
        self.handshake_timeout = handshake;
        self.ping_timeout = ping;
        self
    }

    /// Verify the bridge listening on `port`.
    ///
    /// A stopped bridge is reported disconnected without any network
    /// traffic. Ping is only attempted after a successful handshake.
    pub fn verify(&self, bridge: &mut dyn BridgeStatus, port: u16) -> BridgeVerificationResult {
        if !bridge.is_running() {
            tracing::warn!("Cannot verify connection: Bridge is not running");
            return BridgeVerificationResult::disconnected();
        }

        let mut session = match self.transport.handshake(port, self.handshake_timeout) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Bridge on port {} is unhealthy: handshake failed: {}", port, e);
                return BridgeVerificationResult::handshake_failed(e);
            }
        };

        match session.ping(self.ping_timeout) {
            Ok(()) => {
                tracing::info!("Bridge on port {} is healthy", port);
                BridgeVerificationResult::healthy()
            }
            Err(e) => {
                tracing::warn!("Bridge on port {} is degraded: ping failed: {}", port, e);
                BridgeVerificationResult::ping_failed(e)
            }
        }
    }

    /// Verify the bridge on its own current port.
    pub fn verify_current(&self, bridge: &mut dyn BridgeStatus) -> BridgeVerificationResult {
        let port = bridge.current_port();
        self.verify(bridge, port)
    }
}

#[cfg(test)]
mod tests {
    use crate::bridge::testing::{FixedBridge, ScriptedTransport};
    use super::*;

    fn running() -> FixedBridge {
        FixedBridge {
            running: true,
            port: 6400,
        }
    }

    #[test]
    fn not_running_is_disconnected_without_network() {
        let (transport, calls) = ScriptedTransport::new(true, true);
        let verifier = BridgeVerifier::new(Box::new(transport));
        let mut bridge = FixedBridge {
            running: false,
            port: 6400,
        };

        let result = verifier.verify(&mut bridge, 6400);
        assert_eq!(result.health(), BridgeHealth::Disconnected);
        assert!(!result.success());
        assert_eq!(calls.handshakes.get(), 0);
        assert_eq!(calls.pings.get(), 0);
    }

    #[test]
    fn failed_handshake_never_pings() {
        let (transport, calls) = ScriptedTransport::new(false, true);
        let verifier = BridgeVerifier::new(Box::new(transport));

        let result = verifier.verify(&mut running(), 6400);
        assert_eq!(result.health(), BridgeHealth::Unhealthy);
        assert!(!result.handshake_valid());
        assert!(!result.ping_succeeded());
        assert!(result.message().starts_with("Handshake failed"));
        assert_eq!(calls.handshakes.get(), 1);
        assert_eq!(calls.pings.get(), 0);
    }

    #[test]
    fn failed_ping_is_degraded() {
        let (transport, calls) = ScriptedTransport::new(true, false);
        let verifier = BridgeVerifier::new(Box::new(transport));

        let result = verifier.verify(&mut running(), 6400);
        assert_eq!(result.health(), BridgeHealth::Degraded);
        assert!(result.handshake_valid());
        assert!(!result.ping_succeeded());
        assert!(!result.success());
        assert!(result.message().starts_with("Ping failed"));
        assert_eq!(calls.pings.get(), 1);
    }

    #[test]
    fn handshake_and_ping_is_healthy() {
        let (transport, _calls) = ScriptedTransport::new(true, true);
        let verifier = BridgeVerifier::new(Box::new(transport));

        let result = verifier.verify_current(&mut running());
        assert_eq!(result.health(), BridgeHealth::Healthy);
        assert!(result.success());
    }

    #[test]
    fn constructors_uphold_invariants() {
        for result in [
            BridgeVerificationResult::disconnected(),
            BridgeVerificationResult::handshake_failed("x"),
            BridgeVerificationResult::ping_failed("x"),
            BridgeVerificationResult::healthy(),
        ] {
            if result.ping_succeeded() {
                assert!(result.handshake_valid());
            }
            assert_eq!(
                result.success(),
                result.handshake_valid() && result.ping_succeeded()
            );
        }
    }

    #[test]
    fn serializes_health_tier() {
        let json = serde_json::to_value(BridgeVerificationResult::ping_failed("timeout")).unwrap();
        assert_eq!(json["health"], "degraded");
        assert_eq!(json["handshake_valid"], true);
    }
}
