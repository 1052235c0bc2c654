//! Per-client status tracking.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::registry::ClientDescriptor;
use super::status::ClientStatus;
use crate::bridge::{BridgeHealth, BridgeVerificationResult};
use crate::error::Result;

/// What a client's configuration file says about the tool-server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvidence {
    /// No config file, or no entry for the server.
    Missing,
    /// The config exists but could not be read or parsed.
    Unreadable(String),
    /// The entry points at a different server location.
    PathMismatch { expected: PathBuf, found: String },
    /// The entry points at the expected server.
    Matches,
}

/// What is known about the bridge when a client is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvidence {
    NotRunning,
    RunningUnverified,
    Verified(BridgeVerificationResult),
}

/// Writes or removes a client's server entry.
pub trait ClientConfigurator {
    fn configure(&self, client: &ClientDescriptor) -> Result<()>;
    fn unregister(&self, client: &ClientDescriptor) -> Result<()>;
}

/// Status of every client seen so far.
#[derive(Debug, Clone, Default)]
pub struct ClientStatusTracker {
    statuses: BTreeMap<&'static str, ClientStatus>,
}

impl ClientStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status. Unknown clients are not configured.
    pub fn status(&self, client: &ClientDescriptor) -> ClientStatus {
        self.statuses.get(client.id).copied().unwrap_or_default()
    }

    /// Configure `client`. On error the status is left unchanged.
    pub fn configure(
        &mut self,
        client: &ClientDescriptor,
        configurator: &dyn ClientConfigurator,
    ) -> Result<ClientStatus> {
        configurator.configure(client)?;
        tracing::info!("Configured {}", client.name);
        Ok(self.set(client, ClientStatus::Configured))
    }

    /// Remove `client`'s configuration. On error the status is left unchanged.
    pub fn unregister(
        &mut self,
        client: &ClientDescriptor,
        configurator: &dyn ClientConfigurator,
    ) -> Result<ClientStatus> {
        configurator.unregister(client)?;
        tracing::info!("Unregistered {}", client.name);
        Ok(self.set(client, ClientStatus::NotConfigured))
    }

    /// Recompute `client`'s status from fresh evidence.
    pub fn check_status(
        &mut self,
        client: &ClientDescriptor,
        config: &ConfigEvidence,
        bridge: &BridgeEvidence,
    ) -> ClientStatus {
        let status = derive_status(config, bridge);
        if let ConfigEvidence::Unreadable(reason) = config {
            tracing::warn!("Could not read {} config: {}", client.name, reason);
        }
        self.set(client, status)
    }

    /// All tracked statuses, by client id.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ClientStatus)> + '_ {
        self.statuses.iter().map(|(id, s)| (*id, *s))
    }

    fn set(&mut self, client: &ClientDescriptor, status: ClientStatus) -> ClientStatus {
        let previous = self.statuses.insert(client.id, status);
        if previous != Some(status) {
            tracing::debug!("{} status: {}", client.name, status);
        }
        status
    }
}

/// Map configuration and bridge evidence to a status.
pub fn derive_status(config: &ConfigEvidence, bridge: &BridgeEvidence) -> ClientStatus {
    match config {
        ConfigEvidence::Missing | ConfigEvidence::Unreadable(_) => ClientStatus::NotConfigured,
        ConfigEvidence::PathMismatch { .. } => ClientStatus::IncorrectPath,
        ConfigEvidence::Matches => match bridge {
            BridgeEvidence::NotRunning => ClientStatus::Configured,
            BridgeEvidence::RunningUnverified => ClientStatus::Running,
            BridgeEvidence::Verified(result) => match result.health() {
                BridgeHealth::Healthy => ClientStatus::Connected,
                BridgeHealth::Degraded => ClientStatus::CommunicationError,
                BridgeHealth::Unhealthy => ClientStatus::NoResponse,
                BridgeHealth::Disconnected => ClientStatus::Configured,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::registry::find_client;
    use crate::error::ToolbridgeError;
    use std::cell::Cell;

    struct CountingConfigurator {
        fail: bool,
        calls: Cell<usize>,
    }

    impl CountingConfigurator {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: Cell::new(0),
            }
        }

        fn call(&self) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(ToolbridgeError::ConfigValidationError {
                    message: "config file is read-only".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl ClientConfigurator for CountingConfigurator {
        fn configure(&self, _client: &ClientDescriptor) -> Result<()> {
            self.call()
        }

        fn unregister(&self, _client: &ClientDescriptor) -> Result<()> {
            self.call()
        }
    }

    fn cursor() -> &'static ClientDescriptor {
        find_client("cursor").unwrap()
    }

    #[test]
    fn unknown_client_is_not_configured() {
        assert_eq!(ClientStatusTracker::new().status(cursor()), ClientStatus::NotConfigured);
    }

    #[test]
    fn configure_then_unregister() {
        let mut tracker = ClientStatusTracker::new();
        let configurator = CountingConfigurator::new(false);

        assert_eq!(
            tracker.configure(cursor(), &configurator).unwrap(),
            ClientStatus::Configured
        );
        assert_eq!(tracker.status(cursor()), ClientStatus::Configured);

        tracker.unregister(cursor(), &configurator).unwrap();
        assert_eq!(tracker.status(cursor()), ClientStatus::NotConfigured);
        assert_eq!(configurator.calls.get(), 2);
    }

    #[test]
    fn failed_configure_leaves_status() {
        let mut tracker = ClientStatusTracker::new();
        tracker.check_status(cursor(), &ConfigEvidence::Matches, &BridgeEvidence::NotRunning);

        let configurator = CountingConfigurator::new(true);
        assert!(tracker.unregister(cursor(), &configurator).is_err());
        assert_eq!(tracker.status(cursor()), ClientStatus::Configured);
    }

    #[test]
    fn status_mapping_table() {
        let path_mismatch = ConfigEvidence::PathMismatch {
            expected: PathBuf::from("/srv/server"),
            found: "/old/server".into(),
        };
        let cases = [
            (
                ConfigEvidence::Missing,
                BridgeEvidence::RunningUnverified,
                ClientStatus::NotConfigured,
            ),
            (
                ConfigEvidence::Unreadable("bad json".into()),
                BridgeEvidence::NotRunning,
                ClientStatus::NotConfigured,
            ),
            (path_mismatch, BridgeEvidence::NotRunning, ClientStatus::IncorrectPath),
            (ConfigEvidence::Matches, BridgeEvidence::NotRunning, ClientStatus::Configured),
            (ConfigEvidence::Matches, BridgeEvidence::RunningUnverified, ClientStatus::Running),
            (
                ConfigEvidence::Matches,
                BridgeEvidence::Verified(BridgeVerificationResult::healthy()),
                ClientStatus::Connected,
            ),
            (
                ConfigEvidence::Matches,
                BridgeEvidence::Verified(BridgeVerificationResult::ping_failed("timeout")),
                ClientStatus::CommunicationError,
            ),
            (
                ConfigEvidence::Matches,
                BridgeEvidence::Verified(BridgeVerificationResult::handshake_failed("refused")),
                ClientStatus::NoResponse,
            ),
            (
                ConfigEvidence::Matches,
                BridgeEvidence::Verified(BridgeVerificationResult::disconnected()),
                ClientStatus::Configured,
            ),
        ];

        for (config, bridge, expected) in cases {
            assert_eq!(derive_status(&config, &bridge), expected, "{:?} / {:?}", config, bridge);
        }
    }

    #[test]
    fn check_status_updates_tracker() {
        let mut tracker = ClientStatusTracker::new();
        let status = tracker.check_status(
            cursor(),
            &ConfigEvidence::Matches,
            &BridgeEvidence::Verified(BridgeVerificationResult::healthy()),
        );
        assert_eq!(status, ClientStatus::Connected);
        assert_eq!(tracker.iter().collect::<Vec<_>>(), vec![("cursor", ClientStatus::Connected)]);
    }
}
