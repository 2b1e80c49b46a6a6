//! Whitelist table records.

use serde::{Deserialize, Serialize};

use super::role::RoleFlags;

/// One validated whitelist row: a trimmed, non-empty username plus its role
/// flags. Rows that fail validation are dropped during parse and never reach
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub username: String,
    pub flags: RoleFlags,
}

/// An ordered, immutable sequence of records, built fresh on every successful
/// load. Consumers hold it behind an `Arc`; replacement swaps the whole `Arc`
/// so no partially built table is ever visible.
///
/// Duplicate usernames are kept as-is; resolution relies on first-match
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTable {
    records: Vec<RoleRecord>,
}

impl RoleTable {
    /// Build a table from already validated records.
    #[must_use]
    pub fn new(records: Vec<RoleRecord>) -> Self {
        Self { records }
    }

    /// Records in original row order.
    #[must_use]
    pub fn records(&self) -> &[RoleRecord] {
        &self.records
    }

    /// First record matching `username` exactly (table side is stored
    /// trimmed; the query string is compared as supplied).
    #[must_use]
    pub fn find(&self, username: &str) -> Option<&RoleRecord> {
        self.records.iter().find(|r| r.username == username)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, flags: RoleFlags) -> RoleRecord {
        RoleRecord {
            username: name.to_string(),
            flags,
        }
    }

    #[test]
    fn find_returns_first_match_only() {
        let table = RoleTable::new(vec![
            record("Alice", RoleFlags::ADMIN),
            record("Alice", RoleFlags::DANCER),
        ]);
        let matched = table.find("Alice").unwrap();
        assert_eq!(matched.flags, RoleFlags::ADMIN);
    }

    #[test]
    fn find_is_exact_not_trimmed() {
        let table = RoleTable::new(vec![record("Alice", RoleFlags::STAFF)]);
        assert!(table.find("Alice ").is_none());
        assert!(table.find("alice").is_none());
    }
}
