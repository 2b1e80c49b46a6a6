//! One viewer's resolution session.
//!
//! Composes the loader, resolver, roster, and broadcaster into the single
//! sequential pass the engine runs per player: roster projection for all
//! users, then resolution and role broadcast for the local viewer. All role
//! computation happens on one control flow; nothing here is parallel.

use std::sync::Arc;

use tracing::{debug, info, warn};
use we_common::{ResolvedPermission, Result, Role};

use crate::broadcast::{DisplaySink, PermissionDisplay, RoleBroadcaster};
use crate::loader::{TableLoader, TextFetcher};
use crate::permissions::{self, BypassList};
use crate::roster::PatronRoster;
use crate::table::ParseStats;

/// Resolution and broadcast pipeline for one local viewer.
pub struct PermissionSession<F> {
    loader: TableLoader<F>,
    bypass: BypassList,
    local_username: String,
    max_patrons: usize,
    broadcaster: RoleBroadcaster,
    display: Option<Arc<dyn DisplaySink>>,
    patron1_sink: Option<Arc<dyn DisplaySink>>,
    patron2_sink: Option<Arc<dyn DisplaySink>>,
}

impl<F: TextFetcher> PermissionSession<F> {
    #[must_use]
    pub fn new(
        loader: TableLoader<F>,
        bypass: BypassList,
        local_username: impl Into<String>,
        max_patrons: usize,
        broadcaster: RoleBroadcaster,
    ) -> Self {
        Self {
            loader,
            bypass,
            local_username: local_username.into(),
            max_patrons,
            broadcaster,
            display: None,
            patron1_sink: None,
            patron2_sink: None,
        }
    }

    /// Wire the permission display text sink.
    #[must_use]
    pub fn with_display(mut self, sink: Arc<dyn DisplaySink>) -> Self {
        self.display = Some(sink);
        self
    }

    /// Wire the two supporter roster text sinks.
    #[must_use]
    pub fn with_roster_sinks(
        mut self,
        patron1: Arc<dyn DisplaySink>,
        patron2: Arc<dyn DisplaySink>,
    ) -> Self {
        self.patron1_sink = Some(patron1);
        self.patron2_sink = Some(patron2);
        self
    }

    #[must_use]
    pub fn broadcaster(&self) -> &RoleBroadcaster {
        &self.broadcaster
    }

    #[must_use]
    pub fn loader(&self) -> &TableLoader<F> {
        &self.loader
    }

    /// Fetch a fresh table, then run one resolution pass. Transport failures
    /// propagate to the caller (operator surface); the pass still runs if an
    /// older table is retained.
    pub async fn load_and_refresh(&self) -> Result<ParseStats> {
        let stats = self.loader.load().await?;
        self.refresh();
        Ok(stats)
    }

    /// Run one resolution pass against the currently published table.
    ///
    /// Returns `None` (with a warning) when no table has been loaded yet —
    /// resolving against an absent table is never attempted.
    pub fn refresh(&self) -> Option<ResolvedPermission> {
        let Some(table) = self.loader.table() else {
            warn!("refresh skipped, whitelist not loaded yet");
            return None;
        };

        // Supporter rosters cover every row, independent of the local user.
        let roster = PatronRoster::build(&table, self.max_patrons);
        publish_roster(self.patron1_sink.as_deref(), roster.patron1());
        publish_roster(self.patron2_sink.as_deref(), roster.patron2());

        let resolved = permissions::resolve(&table, &self.local_username, &self.bypass);
        debug!(
            resolved = %serde_json::to_string(&resolved).unwrap_or_default(),
            "local user resolved"
        );

        self.broadcaster.apply_resolved(&resolved);
        PermissionDisplay::from_resolution(&resolved).publish(self.display.as_deref());

        info!(
            username = %resolved.username,
            source = resolved.source.label(),
            access_level = resolved.access_label(),
            "resolution pass complete"
        );
        Some(resolved)
    }

    /// Manual elevation: grant `role` (Admin cascades) and refresh the
    /// display from the broadcaster's current state.
    pub fn grant(&self, role: Role) {
        self.broadcaster.grant(role);
        PermissionDisplay::from_manual(&self.local_username, self.broadcaster.highest_active())
            .publish(self.display.as_deref());
    }

    /// De-authorize: deactivate every registered role.
    pub fn revoke_all(&self) {
        self.broadcaster.revoke_all();
    }
}

fn publish_roster(sink: Option<&dyn DisplaySink>, names: &[String]) {
    match sink {
        Some(sink) => sink.set_text(&PatronRoster::render(names)),
        None => warn!("supporter roster sink is not wired up"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use we_common::{Error, PermissionSource};

    use crate::broadcast::{EffectTarget, FlagTarget};

    struct StaticFetcher(&'static str);

    impl TextFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingFetcher;

    impl TextFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Err(Error::Transport("unreachable".into()))
        }
    }

    #[derive(Default)]
    struct CaptureSink(Mutex<String>);

    impl DisplaySink for CaptureSink {
        fn set_text(&self, text: &str) {
            *self.0.lock().unwrap() = text.to_string();
        }
    }

    impl CaptureSink {
        fn text(&self) -> String {
            self.0.lock().unwrap().clone()
        }
    }

    const SAMPLE: &str = "header\nAlice,1,0,0,0,0,1,0\nBob,0,0,0,1,0,0,1\n";

    fn session(
        raw: &'static str,
        username: &str,
    ) -> (
        PermissionSession<StaticFetcher>,
        Arc<CaptureSink>,
        Arc<CaptureSink>,
        Arc<CaptureSink>,
    ) {
        let mut broadcaster = RoleBroadcaster::new();
        for role in Role::DESCENDING {
            broadcaster.register(role, vec![Some(Arc::new(FlagTarget::new(role.label())))]);
        }

        let display = Arc::new(CaptureSink::default());
        let patron1 = Arc::new(CaptureSink::default());
        let patron2 = Arc::new(CaptureSink::default());

        let session = PermissionSession::new(
            TableLoader::new(StaticFetcher(raw), "http://example/whitelist.csv"),
            BypassList::default(),
            username,
            100,
            broadcaster,
        )
        .with_display(display.clone())
        .with_roster_sinks(patron1.clone(), patron2.clone());

        (session, display, patron1, patron2)
    }

    #[tokio::test]
    async fn full_pass_resolves_and_projects() {
        let (session, display, patron1, patron2) = session(SAMPLE, "Bob");

        session.load_and_refresh().await.unwrap();

        assert_eq!(
            display.text(),
            "Username: Bob\nSource: Whitelist\nAccess Level: Staff"
        );
        assert_eq!(patron1.text(), "Alice\n");
        assert_eq!(patron2.text(), "Bob\n");
    }

    #[tokio::test]
    async fn refresh_without_table_is_skipped() {
        let (session, display, _, _) = session(SAMPLE, "Bob");
        assert!(session.refresh().is_none());
        assert_eq!(display.text(), "");
    }

    #[tokio::test]
    async fn transport_failure_propagates_without_touching_display() {
        let session = PermissionSession::new(
            TableLoader::new(FailingFetcher, "http://example/whitelist.csv"),
            BypassList::default(),
            "Bob",
            100,
            RoleBroadcaster::new(),
        );
        let err = session.load_and_refresh().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn unmatched_user_gets_default_display() {
        let (session, display, _, _) = session(SAMPLE, "Ghost");
        session.load_and_refresh().await.unwrap();
        assert_eq!(
            display.text(),
            "Username: Ghost\nSource: Whitelist\nAccess Level: Rank"
        );
    }

    #[tokio::test]
    async fn malformed_row_does_not_affect_neighbors() {
        let raw = "header\nAlice,1,0,0,0,0,1,0\nBroken,1,0\nBob,0,0,0,1,0,0,1\n";
        let (session, display, patron1, patron2) = session(raw, "Bob");
        let stats = session.load_and_refresh().await.unwrap();

        assert_eq!(stats.bad_field_count, 1);
        assert!(display.text().contains("Access Level: Staff"));
        assert_eq!(patron1.text(), "Alice\n");
        assert_eq!(patron2.text(), "Bob\n");
    }

    #[tokio::test]
    async fn bypassed_user_resolves_admin_from_session() {
        let mut broadcaster = RoleBroadcaster::new();
        let admin = Arc::new(FlagTarget::new("admin"));
        broadcaster.register(Role::Admin, vec![Some(admin.clone())]);

        let display = Arc::new(CaptureSink::default());
        let session = PermissionSession::new(
            TableLoader::new(StaticFetcher(SAMPLE), "http://example/whitelist.csv"),
            BypassList::new(vec!["Owner".into()]),
            "Owner",
            100,
            broadcaster,
        )
        .with_display(display.clone());

        session.load_and_refresh().await.unwrap();
        let resolved = session.refresh().unwrap();
        assert_eq!(resolved.source, PermissionSource::Bypassed);
        assert!(admin.is_active());
        assert!(display.text().contains("Source: Bypassed"));
    }

    #[tokio::test]
    async fn manual_grant_updates_display_from_broadcaster_state() {
        let (session, display, _, _) = session(SAMPLE, "Bob");
        session.load_and_refresh().await.unwrap();

        session.grant(Role::Admin);
        assert_eq!(
            display.text(),
            "Username: Bob\nSource: Keypad\nAccess Level: Admin"
        );

        session.revoke_all();
        assert_eq!(session.broadcaster().highest_active(), None);
    }
}
