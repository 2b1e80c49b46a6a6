//! CSV whitelist parser.
//!
//! Format: newline-delimited, comma-separated, one header row (always
//! skipped), then exactly 8 fields per data row:
//! `username,admin,headstaff,security,staff,dancer,patron1,patron2`.
//!
//! No quoting or escaping is supported; a field containing a literal comma
//! corrupts that row's field count and the row is skipped. This is a
//! documented limitation of the upstream sheet export, not something the
//! parser tries to repair.

use serde::Serialize;
use tracing::{debug, warn};
use we_common::{RoleFlags, RoleRecord, RoleTable};

/// Expected field count per data row.
pub const FIELDS_PER_ROW: usize = 8;

/// Row-level accounting for one parse pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Data rows seen (header excluded).
    pub rows: usize,
    /// Rows dropped for a wrong field count.
    pub bad_field_count: usize,
    /// Rows dropped for a blank username.
    pub blank_username: usize,
}

impl ParseStats {
    /// Total rows dropped.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.bad_field_count + self.blank_username
    }
}

/// A flag field is active iff it trims to exactly `"1"`. Anything else —
/// `"0"`, empty, or malformed text — is inactive. The trim also strips the
/// `'\r'` left on the last field by CRLF input.
#[must_use]
pub fn is_role_active(field: &str) -> bool {
    field.trim() == "1"
}

/// Parse raw whitelist text into a fresh table.
///
/// The first line is a header and is always skipped, even when it would
/// validate as a data row. Invalid rows are counted and skipped; the parse
/// itself never fails.
#[must_use]
pub fn parse(raw: &str) -> (RoleTable, ParseStats) {
    let mut stats = ParseStats::default();
    let mut records = Vec::new();

    for line in raw.split('\n').skip(1) {
        // A trailing newline yields one empty final line; not a row.
        if line.trim().is_empty() {
            continue;
        }
        stats.rows += 1;
        match parse_row(line) {
            RowOutcome::Record(record) => records.push(record),
            RowOutcome::BadFieldCount(count) => {
                stats.bad_field_count += 1;
                debug!(fields = count, "skipping row with wrong field count");
            }
            RowOutcome::BlankUsername => {
                stats.blank_username += 1;
                debug!("skipping row with blank username");
            }
        }
    }

    if stats.skipped() > 0 {
        warn!(
            rows = stats.rows,
            bad_field_count = stats.bad_field_count,
            blank_username = stats.blank_username,
            "whitelist parse skipped malformed rows"
        );
    }

    (RoleTable::new(records), stats)
}

enum RowOutcome {
    Record(RoleRecord),
    BadFieldCount(usize),
    BlankUsername,
}

fn parse_row(line: &str) -> RowOutcome {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELDS_PER_ROW {
        return RowOutcome::BadFieldCount(fields.len());
    }

    let username = fields[0].trim();
    if username.is_empty() {
        return RowOutcome::BlankUsername;
    }

    const FLAG_ORDER: [RoleFlags; 7] = [
        RoleFlags::ADMIN,
        RoleFlags::HEAD_STAFF,
        RoleFlags::SECURITY,
        RoleFlags::STAFF,
        RoleFlags::DANCER,
        RoleFlags::PATRON_1,
        RoleFlags::PATRON_2,
    ];

    let mut flags = RoleFlags::empty();
    for (field, flag) in fields[1..].iter().zip(FLAG_ORDER) {
        if is_role_active(field) {
            flags |= flag;
        }
    }

    RowOutcome::Record(RoleRecord {
        username: username.to_string(),
        flags,
    })
}
