//! Error taxonomy for the role engine.
//!
//! Only failures that a caller must react to are errors. Malformed CSV rows
//! are skipped at the row level and patron-capacity overflow degrades to a
//! warning; neither appears here.

use thiserror::Error;

/// Engine-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to callers of the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Remote table fetch failed. The previously loaded table is retained.
    #[error("transport error: {0}")]
    Transport(String),

    /// A load was requested while another is still in flight.
    #[error("table load already in flight")]
    LoadInFlight,

    /// A synchronized write was attempted without holding ownership.
    #[error("player {0} is not the owner of the synced state")]
    NotOwner(crate::types::PlayerId),

    /// An invalid component configuration was rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
