use crate::error::Result;
use log::warn;
use std::collections::HashSet;

/// Kinds of friendly obstruction that may cover the creative
///
/// Friendly obstructions are part of the ad's own presentation and must be
/// excluded from "ad is occluded" viewability measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstructionKind {
    /// The blur applied over the last video frame when no companion exists
    BlurEffect,

    /// Interactive chrome such as skip and close controls
    OverlayControls,
}

/// Opaque handle identifying one active obstruction registration
///
/// Handles are never reused within a tracker instance, so a stale handle can
/// be detected rather than silently deregistering someone else's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(u64);

/// Contract with the external viewability-measurement collaborator
///
/// The registered-handle set must mirror the set of currently visible
/// obstruction views at every transition boundary; the container calls
/// `unregister` the moment an obstruction is hidden or torn down.
pub trait ViewabilityTracker {
    /// Register a visible friendly obstruction
    fn register(&mut self, kind: ObstructionKind) -> Result<RegistrationHandle>;

    /// Remove a prior registration
    fn unregister(&mut self, handle: RegistrationHandle);
}

/// Tracker for hosts with no measurement vendor attached
///
/// Registrations succeed and report nothing, so the container logic is
/// identical with and without a vendor.
#[derive(Debug, Default)]
pub struct NoopViewabilityTracker {
    next_id: u64,
}

impl ViewabilityTracker for NoopViewabilityTracker {
    fn register(&mut self, _kind: ObstructionKind) -> Result<RegistrationHandle> {
        self.next_id += 1;
        Ok(RegistrationHandle(self.next_id))
    }

    fn unregister(&mut self, _handle: RegistrationHandle) {}
}

/// In-memory tracker keeping the set of active registrations for one session
#[derive(Debug, Default)]
pub struct SessionViewabilityTracker {
    next_id: u64,
    active: HashSet<RegistrationHandle>,
}

impl SessionViewabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of obstructions currently registered
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether a handle is still registered
    pub fn is_registered(&self, handle: RegistrationHandle) -> bool {
        self.active.contains(&handle)
    }
}

impl ViewabilityTracker for SessionViewabilityTracker {
    fn register(&mut self, kind: ObstructionKind) -> Result<RegistrationHandle> {
        self.next_id += 1;
        let handle = RegistrationHandle(self.next_id);
        self.active.insert(handle);
        log::debug!("registered obstruction {:?} as {:?}", kind, handle);
        Ok(handle)
    }

    fn unregister(&mut self, handle: RegistrationHandle) {
        if !self.active.remove(&handle) {
            warn!("unregister of unknown obstruction handle {:?}", handle);
        }
    }
}
