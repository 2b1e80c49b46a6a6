//! Display projection for the permission text UI.

use tracing::warn;
use we_common::{PermissionSource, ResolvedPermission, Role};

/// Anything that can show the three-line permission record. The original
/// renders into a world-space text field; the daemon logs it.
pub trait DisplaySink: Send + Sync {
    fn set_text(&self, text: &str);
}

/// The three-line record rendered whenever resolution completes or a manual
/// role change occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDisplay {
    pub username: String,
    pub source: &'static str,
    pub access_level: &'static str,
}

impl PermissionDisplay {
    /// Projection of a table/bypass resolution. A user with no active role
    /// shows the default "Rank" level.
    #[must_use]
    pub fn from_resolution(resolved: &ResolvedPermission) -> Self {
        Self {
            username: resolved.username.clone(),
            source: resolved.source.label(),
            access_level: resolved.access_label(),
        }
    }

    /// Projection after a manual role change, reflecting whatever the
    /// broadcaster currently reports. No active role shows the neutral
    /// "User" label.
    #[must_use]
    pub fn from_manual(username: impl Into<String>, highest: Option<Role>) -> Self {
        Self {
            username: username.into(),
            source: PermissionSource::Manual.label(),
            access_level: highest.map_or("User", Role::label),
        }
    }

    /// Plain-text rendering, one field per line.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Username: {}\nSource: {}\nAccess Level: {}",
            self.username, self.source, self.access_level
        )
    }

    /// Push the rendering to a sink; a missing sink degrades to a warning
    /// rather than aborting the pass.
    pub fn publish(&self, sink: Option<&dyn DisplaySink>) {
        match sink {
            Some(sink) => sink.set_text(&self.render()),
            None => warn!("permission display sink is not wired up"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use we_common::RoleFlags;

    struct CaptureSink(Mutex<String>);

    impl DisplaySink for CaptureSink {
        fn set_text(&self, text: &str) {
            *self.0.lock().unwrap() = text.to_string();
        }
    }

    #[test]
    fn renders_three_lines() {
        let resolved = ResolvedPermission {
            username: "Bob".into(),
            source: PermissionSource::Whitelist,
            highest: Some(Role::Staff),
            flags: RoleFlags::STAFF,
        };
        let display = PermissionDisplay::from_resolution(&resolved);
        assert_eq!(
            display.render(),
            "Username: Bob\nSource: Whitelist\nAccess Level: Staff"
        );
    }

    #[test]
    fn unmatched_user_shows_default_label() {
        let display = PermissionDisplay::from_resolution(&ResolvedPermission::unmatched("Ghost"));
        assert_eq!(display.access_level, "Rank");
        assert_eq!(display.source, "Whitelist");
    }

    #[test]
    fn manual_projection_uses_keypad_source_and_user_fallback() {
        let display = PermissionDisplay::from_manual("Bob", None);
        assert_eq!(display.source, "Keypad");
        assert_eq!(display.access_level, "User");

        let elevated = PermissionDisplay::from_manual("Bob", Some(Role::Admin));
        assert_eq!(elevated.access_level, "Admin");
    }

    #[test]
    fn publish_writes_to_sink_and_tolerates_none() {
        let sink = CaptureSink(Mutex::new(String::new()));
        let display = PermissionDisplay::from_manual("Bob", Some(Role::Staff));
        display.publish(Some(&sink));
        assert!(sink.0.lock().unwrap().contains("Access Level: Staff"));

        // Must not panic.
        display.publish(None);
    }
}
