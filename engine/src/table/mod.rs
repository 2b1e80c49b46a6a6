//! Whitelist CSV parsing.
//!
//! Best-effort, partial-success semantics: a malformed row is skipped and
//! never invalidates the rest of the table.

pub mod parser;

pub use parser::{parse, ParseStats, FIELDS_PER_ROW};
