//! `WorldExtension` Common Library
//!
//! Shared types and error taxonomy used by the role engine and its
//! collaborators (display sinks, effect targets, persistence stores).

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
