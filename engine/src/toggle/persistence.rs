//! Per-player persistence for toggle state.
//!
//! The store is an external collaborator behind a small repository
//! interface; no transactionality is assumed beyond the single key being
//! written. Keys are scoped per (player, identifier) pair.

use dashmap::DashMap;
use we_common::PlayerId;

/// Keyed boolean store, scoped to one player per key.
pub trait PersistenceStore: Send + Sync {
    /// Read the persisted value, if one was ever written.
    fn get_bool(&self, player: PlayerId, key: &str) -> Option<bool>;

    /// Write the value for the local player.
    fn set_bool(&self, player: PlayerId, key: &str, value: bool);

    /// Read the persisted value, initializing it to `default` with an
    /// immediate first write when no entry exists. Atomic with respect to
    /// other toggles on the same (player, key) pair.
    fn get_or_init(&self, player: PlayerId, key: &str, default: bool) -> bool;
}

/// In-memory store backed by a concurrent map. The production analog is the
/// host's per-player key/value service.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<(PlayerId, String), bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceStore for MemoryStore {
    fn get_bool(&self, player: PlayerId, key: &str) -> Option<bool> {
        self.entries.get(&(player, key.to_string())).map(|v| *v)
    }

    fn set_bool(&self, player: PlayerId, key: &str, value: bool) {
        self.entries.insert((player, key.to_string()), value);
    }

    fn get_or_init(&self, player: PlayerId, key: &str, default: bool) -> bool {
        // The entry guard makes the read-then-maybe-write atomic per key.
        *self
            .entries
            .entry((player, key.to_string()))
            .or_insert(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_is_uninitialized() {
        let store = MemoryStore::new();
        let player = PlayerId::new();
        assert_eq!(store.get_bool(player, "door.state"), None);
    }

    #[test]
    fn get_or_init_writes_the_default_once() {
        let store = MemoryStore::new();
        let player = PlayerId::new();

        assert!(store.get_or_init(player, "door.state", true));
        // Second call sees the stored value, not the new default.
        assert!(store.get_or_init(player, "door.state", false));
        assert_eq!(store.get_bool(player, "door.state"), Some(true));
    }

    #[test]
    fn keys_are_scoped_per_player() {
        let store = MemoryStore::new();
        let a = PlayerId::new();
        let b = PlayerId::new();

        store.set_bool(a, "door.state", true);
        assert_eq!(store.get_bool(a, "door.state"), Some(true));
        assert_eq!(store.get_bool(b, "door.state"), None);
    }

    #[test]
    fn identifiers_are_independent() {
        let store = MemoryStore::new();
        let player = PlayerId::new();

        store.set_bool(player, "door.state", true);
        store.set_bool(player, "lamp.state", false);
        assert_eq!(store.get_bool(player, "door.state"), Some(true));
        assert_eq!(store.get_bool(player, "lamp.state"), Some(false));
    }
}
