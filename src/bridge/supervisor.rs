//! Tick-driven bridge supervision.
//!
//! Starting a bridge is not instantaneous, so verification is never run
//! inline with Start. Instead a [`FollowUp::Verify`] is queued and handled on
//! the next [`BridgeSupervisor::tick`], and only if the bridge is running by
//! then.

use std::collections::VecDeque;

use super::health::HealthIndicator;
use super::lifecycle::{BridgeManager, StartOutcome, StopOutcome};
use super::verifier::{BridgeVerificationResult, BridgeVerifier};
use crate::error::Result;

/// Deferred work run on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Verify,
}

/// What [`BridgeSupervisor::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started(StartOutcome),
    Stopped(StopOutcome),
}

/// State observed during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub running: bool,
    pub verification: Option<BridgeVerificationResult>,
}

/// Owns a bridge and its verifier, and keeps the health indicator current.
pub struct BridgeSupervisor {
    manager: BridgeManager,
    verifier: BridgeVerifier,
    follow_ups: VecDeque<FollowUp>,
    indicator: HealthIndicator,
    last_result: Option<BridgeVerificationResult>,
}

impl BridgeSupervisor {
    pub fn new(manager: BridgeManager, verifier: BridgeVerifier) -> Self {
        Self {
            manager,
            verifier,
            follow_ups: VecDeque::new(),
            indicator: HealthIndicator::unknown(),
            last_result: None,
        }
    }

    /// Start the bridge and queue a verification.
    pub fn start(&mut self) -> Result<StartOutcome> {
        let outcome = self.manager.start()?;
        self.follow_ups.push_back(FollowUp::Verify);
        Ok(outcome)
    }

    /// Stop the bridge and reset the indicator.
    pub fn stop(&mut self) -> Result<StopOutcome> {
        let outcome = self.manager.stop()?;
        self.follow_ups.clear();
        self.indicator = HealthIndicator::unknown();
        self.last_result = None;
        Ok(outcome)
    }

    /// Stop if running, otherwise start.
    pub fn toggle(&mut self) -> Result<ToggleOutcome> {
        if self.manager.is_running() {
            self.stop().map(ToggleOutcome::Stopped)
        } else {
            self.start().map(ToggleOutcome::Started)
        }
    }

    /// Poll the bridge and run any queued follow-ups.
    pub fn tick(&mut self) -> TickReport {
        let running = self.manager.is_running();
        if !running && self.last_result.is_some() {
            self.indicator = HealthIndicator::unknown();
            self.last_result = None;
        }

        let mut verification = None;
        while let Some(follow_up) = self.follow_ups.pop_front() {
            match follow_up {
                FollowUp::Verify if running => {
                    verification = Some(self.verify_now());
                }
                FollowUp::Verify => {
                    tracing::debug!("Skipping verification: bridge is not running");
                }
            }
        }

        TickReport {
            running,
            verification,
        }
    }

    /// Verify immediately and update the indicator.
    pub fn verify_now(&mut self) -> BridgeVerificationResult {
        let result = self.verifier.verify_current(&mut self.manager);
        self.indicator = HealthIndicator::from_result(&result);
        self.last_result = Some(result.clone());
        result
    }

    /// Follow-ups waiting for the next tick.
    pub fn pending(&self) -> impl Iterator<Item = &FollowUp> {
        self.follow_ups.iter()
    }

    pub fn indicator(&self) -> &HealthIndicator {
        &self.indicator
    }

    pub fn last_result(&self) -> Option<&BridgeVerificationResult> {
        self.last_result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::lifecycle::BridgeOptions;
    use crate::bridge::testing::{FakeLauncher, ProcessState, ScriptedTransport};
    use crate::bridge::verifier::BridgeHealth;
    use std::net::TcpListener;
    use std::rc::Rc;

    fn supervisor(
        handshake_ok: bool,
        ping_ok: bool,
    ) -> (BridgeSupervisor, Rc<ProcessState>, Rc<crate::bridge::testing::Calls>) {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let state = Rc::new(ProcessState::default());
        let manager = BridgeManager::new(
            Box::new(FakeLauncher(state.clone())),
            BridgeOptions {
                port,
                attach_existing: false,
            },
        );
        let (transport, calls) = ScriptedTransport::new(handshake_ok, ping_ok);
        let verifier = BridgeVerifier::new(Box::new(transport));
        (BridgeSupervisor::new(manager, verifier), state, calls)
    }

    #[test]
    fn start_defers_verification_to_next_tick() {
        let (mut sup, _state, calls) = supervisor(true, true);

        sup.start().unwrap();
        assert_eq!(calls.handshakes.get(), 0);
        assert_eq!(sup.pending().count(), 1);

        let report = sup.tick();
        assert!(report.running);
        assert_eq!(
            report.verification.map(|r| r.health()),
            Some(BridgeHealth::Healthy)
        );
        assert_eq!(sup.indicator().label, "Healthy");
        assert_eq!(sup.pending().count(), 0);
    }

    #[test]
    fn follow_up_is_dropped_if_bridge_exited() {
        let (mut sup, state, calls) = supervisor(true, true);

        sup.start().unwrap();
        state.exited.set(true);

        let report = sup.tick();
        assert!(!report.running);
        assert!(report.verification.is_none());
        assert_eq!(calls.handshakes.get(), 0);
        assert_eq!(sup.indicator().label, "Unknown");
    }

    #[test]
    fn toggle_starts_then_stops() {
        let (mut sup, state, _calls) = supervisor(true, false);

        assert!(matches!(
            sup.toggle().unwrap(),
            ToggleOutcome::Started(StartOutcome::Spawned { .. })
        ));
        sup.tick();
        assert_eq!(sup.indicator().label, "Ping Failed");

        assert_eq!(
            sup.toggle().unwrap(),
            ToggleOutcome::Stopped(StopOutcome::Terminated)
        );
        assert_eq!(state.terminations.get(), 1);
        assert_eq!(sup.indicator().label, "Unknown");
        assert!(sup.last_result().is_none());
    }

    #[test]
    fn tick_without_follow_ups_does_not_verify() {
        let (mut sup, _state, calls) = supervisor(true, true);
        sup.start().unwrap();
        sup.tick();
        sup.tick();
        assert_eq!(calls.handshakes.get(), 1);
    }

    #[test]
    fn exit_resets_indicator() {
        let (mut sup, state, _calls) = supervisor(false, false);
        sup.start().unwrap();
        sup.tick();
        assert_eq!(sup.indicator().label, "Unhealthy");

        state.exited.set(true);
        let report = sup.tick();
        assert!(!report.running);
        assert_eq!(sup.indicator().label, "Unknown");
    }
}
