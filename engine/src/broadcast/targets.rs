//! Effect target capability.
//!
//! Abstracts host-driven activation state (scene object enable/disable in
//! the original) so the broadcaster can drive any rendering, UI, or service
//! layer.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// An addressable handle whose active/inactive state the broadcaster
/// controls.
pub trait EffectTarget: Send + Sync {
    /// Handle name, for logging.
    fn name(&self) -> &str;

    /// Set the target's active state.
    fn set_active(&self, active: bool);

    /// Current active state.
    fn is_active(&self) -> bool;
}

/// A plain in-memory target backed by an atomic flag. Used by the daemon's
/// log-backed role groups and by tests.
#[derive(Debug)]
pub struct FlagTarget {
    name: String,
    active: AtomicBool,
}

impl FlagTarget {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: AtomicBool::new(false),
        }
    }

    /// Create a target that starts out active.
    #[must_use]
    pub fn active(name: impl Into<String>) -> Self {
        let target = Self::new(name);
        target.active.store(true, Ordering::Relaxed);
        target
    }
}

impl EffectTarget for FlagTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_active(&self, active: bool) {
        debug!(target_name = %self.name, active, "effect target toggled");
        self.active.store(active, Ordering::Relaxed);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_target_round_trips_state() {
        let target = FlagTarget::new("door");
        assert!(!target.is_active());
        target.set_active(true);
        assert!(target.is_active());
        target.set_active(false);
        assert!(!target.is_active());
    }

    #[test]
    fn active_constructor_starts_enabled() {
        assert!(FlagTarget::active("lamp").is_active());
    }
}
