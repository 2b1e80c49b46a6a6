//! Whitelist resolution logic.
//!
//! Resolution order:
//! 1. Bypass list membership short-circuits to a full staff grant.
//! 2. First matching table row wins; later duplicates are never consulted.
//! 3. Highest role by fixed precedence Admin > `HeadStaff` > Security >
//!    Staff > Dancer.
//! 4. No match resolves to the neutral default, not an error.

use tracing::debug;
use we_common::{PermissionSource, ResolvedPermission, Role, RoleTable};

/// Configured set of usernames always granted top-tier access regardless of
/// table content. Membership is trim-then-exact-match on the configured
/// entries.
#[derive(Debug, Clone, Default)]
pub struct BypassList {
    entries: Vec<String>,
}

impl BypassList {
    #[must_use]
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// `username` is compared as supplied; each configured entry is trimmed
    /// before the exact comparison.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.entries.iter().any(|entry| entry.trim() == username)
    }
}

/// Compute the resolved permission for `username`.
///
/// Bypass membership strictly dominates table data: a bypassed user resolves
/// to Admin even when the table lists them with every flag off.
#[must_use]
pub fn resolve(table: &RoleTable, username: &str, bypass: &BypassList) -> ResolvedPermission {
    if bypass.contains(username) {
        debug!(username, "user is bypassed");
        return ResolvedPermission::bypassed(username);
    }

    match table.find(username) {
        Some(record) => ResolvedPermission {
            username: username.to_string(),
            source: PermissionSource::Whitelist,
            highest: Role::from_flags(record.flags),
            flags: record.flags,
        },
        None => ResolvedPermission::unmatched(username),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use we_common::{PermissionSource, RoleFlags, RoleRecord};

    fn table(rows: &[(&str, RoleFlags)]) -> RoleTable {
        RoleTable::new(
            rows.iter()
                .map(|(name, flags)| RoleRecord {
                    username: (*name).to_string(),
                    flags: *flags,
                })
                .collect(),
        )
    }

    #[test]
    fn bypass_dominates_table_data() {
        // Bob is in the table with every flag off, but bypass wins.
        let table = table(&[("Bob", RoleFlags::empty())]);
        let bypass = BypassList::new(vec!["Bob".into()]);

        let resolved = resolve(&table, "Bob", &bypass);
        assert_eq!(resolved.source, PermissionSource::Bypassed);
        assert_eq!(resolved.highest, Some(Role::Admin));
        assert_eq!(resolved.flags, RoleFlags::STAFF_ROLES);
    }

    #[test]
    fn bypass_entries_are_trimmed_before_comparison() {
        let bypass = BypassList::new(vec!["  Bob  ".into()]);
        assert!(bypass.contains("Bob"));
        assert!(!bypass.contains("  Bob  "));
    }

    #[test]
    fn first_match_wins_for_duplicate_rows() {
        let table = table(&[("Alice", RoleFlags::STAFF), ("Alice", RoleFlags::ADMIN)]);
        let resolved = resolve(&table, "Alice", &BypassList::default());
        assert_eq!(resolved.highest, Some(Role::Staff));
    }

    #[test]
    fn highest_role_follows_fixed_precedence() {
        let table = table(&[
            ("Everything", RoleFlags::STAFF_ROLES),
            ("StaffDancer", RoleFlags::STAFF | RoleFlags::DANCER),
        ]);
        let bypass = BypassList::default();

        let all = resolve(&table, "Everything", &bypass);
        assert_eq!(all.highest, Some(Role::Admin));

        let mid = resolve(&table, "StaffDancer", &bypass);
        assert_eq!(mid.highest, Some(Role::Staff));
    }

    #[test]
    fn matched_row_with_no_flags_is_whitelist_none() {
        let table = table(&[("Lurker", RoleFlags::empty())]);
        let resolved = resolve(&table, "Lurker", &BypassList::default());
        assert_eq!(resolved.source, PermissionSource::Whitelist);
        assert_eq!(resolved.highest, None);
        assert_eq!(resolved.access_label(), "Rank");
    }

    #[test]
    fn no_match_yields_neutral_default() {
        let table = table(&[("Alice", RoleFlags::ADMIN)]);
        let resolved = resolve(&table, "Ghost", &BypassList::default());
        assert_eq!(resolved.source, PermissionSource::Whitelist);
        assert_eq!(resolved.highest, None);
        assert!(resolved.flags.is_empty());
    }

    #[test]
    fn patron_tags_alone_do_not_grant_a_role() {
        let table = table(&[("Supporter", RoleFlags::PATRON_1 | RoleFlags::PATRON_2)]);
        let resolved = resolve(&table, "Supporter", &BypassList::default());
        assert_eq!(resolved.highest, None);
        assert!(resolved.flags.contains(RoleFlags::PATRON_1));
    }

    #[test]
    fn end_to_end_example_from_raw_text() {
        let raw = "header\nAlice,1,0,0,0,0,1,0\nBob,0,0,0,1,0,0,1\n";
        let (table, _) = crate::table::parse(raw);
        let resolved = resolve(&table, "Bob", &BypassList::default());
        assert_eq!(resolved.source, PermissionSource::Whitelist);
        assert_eq!(resolved.highest, Some(Role::Staff));
    }

    #[test]
    fn resolution_ignores_rows_after_the_match() {
        let table = table(&[
            ("Bob", RoleFlags::DANCER),
            ("Bob", RoleFlags::ADMIN),
            ("Bob", RoleFlags::SECURITY),
        ]);
        let resolved = resolve(&table, "Bob", &BypassList::default());
        assert_eq!(resolved.highest, Some(Role::Dancer));
    }
}
