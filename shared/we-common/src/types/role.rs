//! Role flags, precedence, and resolved-permission records.
//!
//! Roles split into two kinds:
//! - Staff tiers (Admin, Head Staff, Security, Staff, Dancer) with a fixed
//!   precedence ordering; these drive effect-target activation.
//! - Patron tags (Patron1, Patron2) used purely for roster display; they are
//!   never granted by the bypass path and never activate targets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-user role flags as parsed from one whitelist row.
    ///
    /// Bit order matches the CSV column order after the username.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct RoleFlags: u8 {
        /// Full administrative access.
        const ADMIN      = 1 << 0;
        /// Head-of-staff tier.
        const HEAD_STAFF = 1 << 1;
        /// Security tier.
        const SECURITY   = 1 << 2;
        /// Regular staff tier.
        const STAFF      = 1 << 3;
        /// Dancer tier.
        const DANCER     = 1 << 4;
        /// High-tier supporter tag (roster only).
        const PATRON_1   = 1 << 5;
        /// Regular supporter tag (roster only).
        const PATRON_2   = 1 << 6;
    }
}

impl RoleFlags {
    /// The five staff tiers. This is what a bypassed user is granted —
    /// patron tags are excluded.
    pub const STAFF_ROLES: Self = Self::ADMIN
        .union(Self::HEAD_STAFF)
        .union(Self::SECURITY)
        .union(Self::STAFF)
        .union(Self::DANCER);
}

/// A staff role tier, ordered by ascending precedence:
/// `Dancer < Staff < Security < HeadStaff < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Dancer,
    Staff,
    Security,
    HeadStaff,
    Admin,
}

impl Role {
    /// All staff roles in descending precedence, the order every
    /// highest-role scan uses.
    pub const DESCENDING: [Self; 5] = [
        Self::Admin,
        Self::HeadStaff,
        Self::Security,
        Self::Staff,
        Self::Dancer,
    ];

    /// The flag bit backing this role.
    #[must_use]
    pub const fn flag(self) -> RoleFlags {
        match self {
            Self::Admin => RoleFlags::ADMIN,
            Self::HeadStaff => RoleFlags::HEAD_STAFF,
            Self::Security => RoleFlags::SECURITY,
            Self::Staff => RoleFlags::STAFF,
            Self::Dancer => RoleFlags::DANCER,
        }
    }

    /// Highest-precedence role present in `flags`, if any.
    #[must_use]
    pub fn from_flags(flags: RoleFlags) -> Option<Self> {
        Self::DESCENDING
            .into_iter()
            .find(|role| flags.contains(role.flag()))
    }

    /// Human-readable label for display projections.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::HeadStaff => "Head Staff",
            Self::Security => "Security",
            Self::Staff => "Staff",
            Self::Dancer => "Dancer",
        }
    }
}

/// Where a resolved permission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSource {
    /// Matched (or defaulted) against the whitelist table.
    Whitelist,
    /// Member of the configured bypass list.
    Bypassed,
    /// Manually elevated (keypad or similar in-world trigger).
    Manual,
}

impl PermissionSource {
    /// Label used in the display projection.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Whitelist => "Whitelist",
            Self::Bypassed => "Bypassed",
            Self::Manual => "Keypad",
        }
    }
}

/// Outcome of one resolution pass for one user. Immutable; built once per
/// pass and discarded after display/broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPermission {
    /// The queried username, as supplied.
    pub username: String,
    /// Where the grant came from.
    pub source: PermissionSource,
    /// Highest-precedence active role; `None` when no flag is active.
    pub highest: Option<Role>,
    /// Full set of active role flags.
    pub flags: RoleFlags,
}

impl ResolvedPermission {
    /// Access-level label; a user with no active role shows the default
    /// "Rank".
    #[must_use]
    pub fn access_label(&self) -> &'static str {
        self.highest.map_or("Rank", Role::label)
    }

    /// Default resolution for a user absent from the table: no roles,
    /// whitelist source.
    #[must_use]
    pub fn unmatched(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            source: PermissionSource::Whitelist,
            highest: None,
            flags: RoleFlags::empty(),
        }
    }

    /// Bypass resolution: full staff grant, patron tags excluded.
    #[must_use]
    pub fn bypassed(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            source: PermissionSource::Bypassed,
            highest: Some(Role::Admin),
            flags: RoleFlags::STAFF_ROLES,
        }
    }
}
