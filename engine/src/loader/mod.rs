//! Asynchronous whitelist loading.
//!
//! The fetch is the only suspending operation in the engine. Callers observe
//! an explicit not-loaded → loaded transition and must not resolve against an
//! absent table. Policy for overlapping requests: a load issued while one is
//! in flight is ignored (`Error::LoadInFlight`) — deterministic, never racy.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{error, info, warn};
use we_common::{Error, Result, RoleTable};

use crate::table::{self, ParseStats};

/// Remote text transport. The engine only ever asks for the full document.
pub trait TextFetcher: Send + Sync {
    /// Fetch the document at `url` as text.
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// HTTP fetcher backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::Transport(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}

/// Observable load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No load has completed yet; there is no table to resolve against.
    NotLoaded,
    /// A fetch is in flight.
    Loading,
    /// A table is available.
    Loaded {
        /// Monotonic counter, bumped on every successful load.
        generation: u64,
        loaded_at: DateTime<Utc>,
    },
    /// The most recent load failed. Any previously loaded table is retained.
    Failed {
        error: String,
        failed_at: DateTime<Utc>,
    },
}

/// Loads, parses, and atomically publishes whitelist tables.
///
/// The current table lives behind a watch channel holding an `Arc`; a
/// successful load swaps the whole `Arc`, so consumers never see a partially
/// built table.
pub struct TableLoader<F> {
    fetcher: F,
    url: String,
    in_flight: AtomicBool,
    generation: AtomicU64,
    table_tx: watch::Sender<Option<Arc<RoleTable>>>,
    state_tx: watch::Sender<LoadState>,
}

impl<F: TextFetcher> TableLoader<F> {
    #[must_use]
    pub fn new(fetcher: F, url: impl Into<String>) -> Self {
        let (table_tx, _) = watch::channel(None);
        let (state_tx, _) = watch::channel(LoadState::NotLoaded);
        Self {
            fetcher,
            url: url.into(),
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            table_tx,
            state_tx,
        }
    }

    /// The currently published table, if any load has ever succeeded.
    #[must_use]
    pub fn table(&self) -> Option<Arc<RoleTable>> {
        self.table_tx.borrow().clone()
    }

    /// Current load lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state_tx.borrow().clone()
    }

    /// Watch the published table for the not-loaded → loaded transition and
    /// subsequent replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RoleTable>>> {
        self.table_tx.subscribe()
    }

    /// Fetch and publish a fresh table.
    ///
    /// On transport failure the previous table is retained unchanged and the
    /// error is surfaced to the operator log; the end-user display never
    /// sees it. A request while another load is pending is ignored.
    pub async fn load(&self) -> Result<ParseStats> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(url = %self.url, "ignoring load request, another is in flight");
            return Err(Error::LoadInFlight);
        }

        self.state_tx.send_replace(LoadState::Loading);
        let outcome = self.fetcher.fetch(&self.url).await;
        self.in_flight.store(false, Ordering::Release);

        match outcome {
            Ok(raw) => {
                let (parsed, stats) = table::parse(&raw);
                let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
                self.table_tx.send_replace(Some(Arc::new(parsed)));
                self.state_tx.send_replace(LoadState::Loaded {
                    generation,
                    loaded_at: Utc::now(),
                });
                info!(
                    url = %self.url,
                    generation,
                    rows = stats.rows,
                    skipped = stats.skipped(),
                    "whitelist loaded"
                );
                Ok(stats)
            }
            Err(err) => {
                error!(url = %self.url, %err, "whitelist load failed, keeping previous table");
                self.state_tx.send_replace(LoadState::Failed {
                    error: err.to_string(),
                    failed_at: Utc::now(),
                });
                Err(err)
            }
        }
    }
}
