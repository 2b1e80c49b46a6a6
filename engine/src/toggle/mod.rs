//! Trigger blocks: a triggerable toggle with optional network sync and
//! optional per-player persistence.
//!
//! A trigger can dispatch an event message to another behaviour, toggle an
//! effect target, or both. Synced and persisted modes are mutually
//! exclusive; combining them is rejected at construction.

pub mod persistence;
pub mod sync;

pub use persistence::{MemoryStore, PersistenceStore};
pub use sync::SyncedToggle;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};
use we_common::{Error, PlayerId, Result};

use crate::broadcast::EffectTarget;

/// Receives the output event message on every trigger (the custom-event
/// dispatch analog).
pub trait MessageSink: Send + Sync {
    fn send(&self, event: &str);
}

/// Static configuration for one trigger block.
#[derive(Debug, Clone)]
pub struct ToggleConfig {
    /// Replicate the toggle across sessions through a [`SyncedToggle`].
    pub synced: bool,
    /// Persist the toggle per player under `identifier`.
    pub persisted: bool,
    /// Persistence key. Reusing an identifier across blocks makes them
    /// trigger together; keep it unique.
    pub identifier: String,
    /// Run the trigger when the block is enabled.
    pub trigger_on_enable: bool,
    /// Run the trigger when the block is disabled.
    pub trigger_on_disable: bool,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            synced: false,
            persisted: false,
            identifier: "unique.identifier".into(),
            trigger_on_enable: false,
            trigger_on_disable: false,
        }
    }
}

/// A triggerable toggle bound to one local player session.
pub struct ToggleBlock {
    config: ToggleConfig,
    local_player: PlayerId,
    target: Option<Arc<dyn EffectTarget>>,
    message: Option<(Arc<dyn MessageSink>, String)>,
    store: Option<Arc<dyn PersistenceStore>>,
    synced: Option<Arc<SyncedToggle>>,
    /// Local state for the non-synced paths.
    toggled: AtomicBool,
}

impl ToggleBlock {
    /// Build a block. Synced and persisted together is rejected — the
    /// combination has no coherent owner for the persisted value.
    pub fn new(config: ToggleConfig, local_player: PlayerId) -> Result<Self> {
        if config.synced && config.persisted {
            return Err(Error::InvalidConfig(
                "a toggle cannot be both synced and persisted".into(),
            ));
        }
        Ok(Self {
            config,
            local_player,
            target: None,
            message: None,
            store: None,
            synced: None,
            toggled: AtomicBool::new(false),
        })
    }

    /// Wire the effect target this block toggles.
    #[must_use]
    pub fn with_target(mut self, target: Arc<dyn EffectTarget>) -> Self {
        self.target = Some(target);
        self
    }

    /// Wire an output message dispatched on every trigger.
    #[must_use]
    pub fn with_message(mut self, sink: Arc<dyn MessageSink>, event: impl Into<String>) -> Self {
        self.message = Some((sink, event.into()));
        self
    }

    /// Wire the per-player persistence store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn PersistenceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Wire the shared synchronized flag.
    #[must_use]
    pub fn with_synced(mut self, synced: Arc<SyncedToggle>) -> Self {
        self.synced = Some(synced);
        self
    }

    /// Initialize state from persistence, sync, or the target's current
    /// active state, in that priority order.
    pub fn start(&self) {
        if self.config.persisted {
            self.load_persistent_state();
        } else if !self.config.synced {
            let current = self.target.as_deref().is_some_and(EffectTarget::is_active);
            self.toggled.store(current, Ordering::Relaxed);
        }
    }

    /// Run the trigger: dispatch the output message, then toggle the target.
    /// Missing collaborators degrade to a skipped side effect.
    pub fn trigger(&self) {
        debug!("trigger block fired");

        if let Some((sink, event)) = &self.message {
            sink.send(event);
            debug!(event = %event, "output message dispatched");
        }

        if self.target.is_some() {
            self.cast_toggle();
        }
    }

    /// Enable hook; runs the trigger when configured to.
    pub fn enable(&self) {
        if self.config.trigger_on_enable {
            self.trigger();
        }
    }

    /// Disable hook; runs the trigger when configured to.
    pub fn disable(&self) {
        if self.config.trigger_on_disable {
            self.trigger();
        }
    }

    /// Remote change notification. Non-owning observers apply the
    /// synchronized value to their local projection; the owner already
    /// applied it on write.
    pub fn on_deserialization(&self) {
        if !self.config.synced {
            return;
        }
        let Some(sync) = &self.synced else { return };
        if sync.owner() == Some(self.local_player) {
            return;
        }
        if let Some(target) = &self.target {
            target.set_active(sync.value());
        }
    }

    /// Player-data restore hook; reloads persisted state for the local
    /// player only.
    pub fn on_player_restored(&self, player: PlayerId) {
        if self.config.persisted && player == self.local_player {
            self.load_persistent_state();
        }
    }

    /// Current local toggle state (non-synced paths).
    #[must_use]
    pub fn toggled(&self) -> bool {
        self.toggled.load(Ordering::Relaxed)
    }

    fn cast_toggle(&self) {
        let Some(target) = &self.target else { return };
        debug!(
            target_name = target.name(),
            synced = self.config.synced,
            persisted = self.config.persisted,
            "toggling target"
        );

        if self.config.synced {
            let Some(sync) = &self.synced else {
                warn!("synced toggle has no sync channel wired up");
                return;
            };
            // Ownership transfer must precede the write.
            sync.claim(self.local_player);
            let next = !sync.value();
            match sync.write(self.local_player, next) {
                Ok(()) => target.set_active(next),
                Err(err) => warn!(%err, "synced write rejected"),
            }
        } else {
            let next = !self.toggled.load(Ordering::Relaxed);
            self.toggled.store(next, Ordering::Relaxed);
            target.set_active(next);

            if self.config.persisted {
                self.save_persistent_state(next);
            }
        }
    }

    fn load_persistent_state(&self) {
        let Some(store) = &self.store else {
            warn!("persisted toggle has no store wired up");
            return;
        };
        // Missing entry means uninitialized: seed it from the target's
        // current state with an immediate first write.
        let current = self.target.as_deref().is_some_and(EffectTarget::is_active);
        let value = store.get_or_init(self.local_player, &self.config.identifier, current);
        self.toggled.store(value, Ordering::Relaxed);
        if let Some(target) = &self.target {
            target.set_active(value);
        }
    }

    fn save_persistent_state(&self, value: bool) {
        match &self.store {
            Some(store) => store.set_bool(self.local_player, &self.config.identifier, value),
            None => warn!("persisted toggle has no store wired up"),
        }
    }
}
