//! Role resolution.
//!
//! Pure computation only: resolving a user against the whitelist has no
//! network or UI side effects. Applying the result to effect targets is the
//! broadcaster's job.

pub mod resolver;

pub use resolver::{resolve, BypassList};
