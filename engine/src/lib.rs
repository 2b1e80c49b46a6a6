//! `WorldExtension` Engine
//!
//! Loads a remotely hosted whitelist CSV, resolves the local viewer's role
//! tier, broadcasts role effects to addressable targets, renders supporter
//! rosters, and drives trigger-block toggles with optional sync and
//! persistence.

pub mod broadcast;
pub mod config;
pub mod loader;
pub mod permissions;
pub mod roster;
pub mod session;
pub mod table;
pub mod toggle;
