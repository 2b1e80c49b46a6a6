//! Supporter roster extraction.
//!
//! Scans the whole table (no bypass interaction, no early exit) and buckets
//! usernames by patron tag. A user may land in both buckets or neither.

use tracing::warn;
use we_common::{RoleFlags, RoleTable};

/// Two independently bounded, ordinally sorted supporter name lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatronRoster {
    patron1: Vec<String>,
    patron2: Vec<String>,
    /// True when the corresponding bucket hit capacity and dropped entries.
    truncated: [bool; 2],
}

impl PatronRoster {
    /// Build the roster from `table`, keeping at most `max` names per
    /// bucket. Overflow never drops already collected entries and never
    /// fails; it is reported as a warning and further entries to the full
    /// bucket are ignored.
    #[must_use]
    pub fn build(table: &RoleTable, max: usize) -> Self {
        let mut patron1 = Vec::new();
        let mut patron2 = Vec::new();
        let mut truncated = [false, false];

        for record in table.records() {
            if record.flags.contains(RoleFlags::PATRON_1) {
                push_bounded(&mut patron1, &record.username, max, &mut truncated[0], "patron1");
            }
            if record.flags.contains(RoleFlags::PATRON_2) {
                push_bounded(&mut patron2, &record.username, max, &mut truncated[1], "patron2");
            }
        }

        // Ordinal (byte-wise) ascending; stable so equal names keep row order.
        patron1.sort();
        patron2.sort();

        Self {
            patron1,
            patron2,
            truncated,
        }
    }

    /// High-tier supporter names, sorted ascending.
    #[must_use]
    pub fn patron1(&self) -> &[String] {
        &self.patron1
    }

    /// Regular supporter names, sorted ascending.
    #[must_use]
    pub fn patron2(&self) -> &[String] {
        &self.patron2
    }

    /// Whether either bucket hit its capacity bound.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated[0] || self.truncated[1]
    }

    /// Newline-terminated name list for one bucket, ready for a text UI.
    #[must_use]
    pub fn render(names: &[String]) -> String {
        let mut out = String::new();
        for name in names {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

fn push_bounded(
    bucket: &mut Vec<String>,
    name: &str,
    max: usize,
    truncated: &mut bool,
    label: &str,
) {
    if bucket.len() < max {
        bucket.push(name.to_string());
    } else {
        if !*truncated {
            warn!(
                bucket = label,
                capacity = max,
                "too many supporters, raise the configured maximum"
            );
        }
        *truncated = true;
    }
}
