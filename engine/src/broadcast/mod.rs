//! Role effect broadcasting.
//!
//! The broadcaster owns no targets; it only toggles the active state of
//! addressable handles registered per role. Missing or null handles degrade
//! to a warning and never abort the rest of a pass.

pub mod display;
pub mod targets;

pub use display::{DisplaySink, PermissionDisplay};
pub use targets::{EffectTarget, FlagTarget};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use we_common::{ResolvedPermission, Role};

/// A registered target slot. `None` models a null handle in the scene
/// wiring; it is tolerated, not repaired.
pub type TargetSlot = Option<Arc<dyn EffectTarget>>;

/// Applies and revokes role effects against named role groups.
#[derive(Default)]
pub struct RoleBroadcaster {
    targets: HashMap<Role, Vec<TargetSlot>>,
}

impl RoleBroadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the effect targets for one role, replacing any previous
    /// registration.
    pub fn register(&mut self, role: Role, slots: Vec<TargetSlot>) {
        self.targets.insert(role, slots);
    }

    /// Set every target of `role` to `active`. Unregistered or empty roles
    /// and null slots are skipped with a warning; a bad slot never aborts
    /// the remaining targets.
    pub fn set_active(&self, role: Role, active: bool) {
        debug!(role = role.label(), active, "setting role targets");

        let Some(slots) = self.targets.get(&role).filter(|s| !s.is_empty()) else {
            warn!(role = role.label(), "no effect targets registered for role");
            return;
        };

        for slot in slots {
            match slot {
                Some(target) => target.set_active(active),
                None => warn!(role = role.label(), "null effect target in role group"),
            }
        }
    }

    /// Activate every staff role flagged in a table-driven resolution.
    ///
    /// Flags are independent and explicit here: activating Admin does NOT
    /// cascade into the lower tiers. Only the manual [`Self::grant`] path
    /// cascades. The asymmetry is deliberate and mirrors the original
    /// behavior, pending product clarification.
    pub fn apply_resolved(&self, resolved: &ResolvedPermission) {
        for role in Role::DESCENDING {
            if resolved.flags.contains(role.flag()) {
                self.set_active(role, true);
            }
        }
    }

    /// Manual elevation (keypad path). Granting Admin also activates
    /// `HeadStaff`, Security, and Staff as an explicit convenience
    /// composition; Dancer is not part of the cascade.
    pub fn grant(&self, role: Role) {
        self.set_active(role, true);
        if role == Role::Admin {
            self.set_active(Role::HeadStaff, true);
            self.set_active(Role::Security, true);
            self.set_active(Role::Staff, true);
        }
    }

    /// Deactivate every registered role's targets unconditionally.
    /// Idempotent; used for de-authorization.
    pub fn revoke_all(&self) {
        for role in Role::DESCENDING {
            if self.targets.contains_key(&role) {
                self.set_active(role, false);
            }
        }
    }

    /// First role, in descending precedence, whose representative target
    /// (the first non-null slot) reports active. `None` means no role is
    /// active and renders as the neutral "User" label.
    #[must_use]
    pub fn highest_active(&self) -> Option<Role> {
        Role::DESCENDING.into_iter().find(|role| {
            self.targets
                .get(role)
                .and_then(|slots| slots.iter().flatten().next())
                .is_some_and(|target| target.is_active())
        })
    }
}
