//! Network-synchronized toggle state.
//!
//! Single-writer model: ownership must be claimed before a write, and only
//! the owning session may write the flag. Every other session observes the
//! value reactively through the watch channel and applies it to its local
//! projection — non-owners never recompute state independently. The
//! invariant is enforced here, not by the transport.

use tokio::sync::watch;
use tracing::debug;
use we_common::{Error, PlayerId, Result};

/// One synchronized boolean flag with explicit ownership.
pub struct SyncedToggle {
    owner_tx: watch::Sender<Option<PlayerId>>,
    value_tx: watch::Sender<bool>,
}

impl SyncedToggle {
    #[must_use]
    pub fn new(initial: bool) -> Self {
        let (owner_tx, _) = watch::channel(None);
        let (value_tx, _) = watch::channel(initial);
        Self { owner_tx, value_tx }
    }

    /// Current owner, if any session has claimed the flag.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        *self.owner_tx.borrow()
    }

    /// Transfer ownership to `player`. This is the explicit
    /// ownership-transfer message; it must precede any local write.
    pub fn claim(&self, player: PlayerId) {
        let previous = self.owner_tx.send_replace(Some(player));
        if previous != Some(player) {
            debug!(%player, ?previous, "synced toggle ownership transferred");
        }
    }

    /// Write the flag. Rejected unless `player` currently owns it.
    pub fn write(&self, player: PlayerId, value: bool) -> Result<()> {
        if self.owner() != Some(player) {
            return Err(Error::NotOwner(player));
        }
        self.value_tx.send_replace(value);
        Ok(())
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> bool {
        *self.value_tx.borrow()
    }

    /// Observe value changes (the change-notification path for non-owners).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.value_tx.subscribe()
    }
}
