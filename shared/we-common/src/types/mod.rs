//! Shared Types

pub mod player;
pub mod role;
pub mod table;

pub use player::PlayerId;
pub use role::{PermissionSource, ResolvedPermission, Role, RoleFlags};
pub use table::{RoleRecord, RoleTable};
