//! Boot sequence of the background process.
//!
//! [`Background::boot`] wires the components together once: the ledger actor
//! over a store, the session tracker over the ledger, and the router over the
//! tracker. Everything else receives handles from here instead of reaching
//! for globals.

use crate::db::storage::LedgerStore;
use crate::libs::clock::Clock;
use crate::libs::ledger::Ledger;
use crate::libs::router::EventRouter;
use crate::libs::tabs::TabLookup;
use crate::libs::tracker::SessionTracker;
use crate::libs::url_matcher::UrlMatcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{info, warn};

const LEDGER_STOP_TIMEOUT: Duration = Duration::from_secs(1);

pub struct Background<T: TabLookup> {
    router: EventRouter<T>,
    ledger_worker: JoinHandle<()>,
}

impl<T: TabLookup> Background<T> {
    /// Must be called inside a tokio runtime.
    pub fn boot<S: LedgerStore>(store: S, tabs: Arc<T>, matcher: UrlMatcher, clock: Arc<dyn Clock>) -> Self {
        let (ledger, ledger_worker) = Ledger::spawn(store);
        let tracker = SessionTracker::new(clock, ledger);
        info!(patterns = ?matcher.patterns(), "background core started");
        let router = EventRouter::new(tracker, tabs, Arc::new(matcher));
        Self { router, ledger_worker }
    }

    pub fn router(&self) -> &EventRouter<T> {
        &self.router
    }

    pub fn tracker(&self) -> &SessionTracker {
        self.router.tracker()
    }

    /// Flushes the open session, drains the ledger, and stops the actor.
    pub async fn shutdown(self) {
        let tracker = self.router.tracker().clone();
        tracker.dispose();
        if let Err(err) = tracker.ledger().sync(tracker.clock().today()).await {
            warn!(error = %err, "ledger did not drain before shutdown");
        }

        drop(tracker);
        drop(self.router);

        // Tracker handles cloned by callers keep the queue open; everything
        // sent before the sync above is already stored, so stop waiting.
        let mut worker = self.ledger_worker;
        match time::timeout(LEDGER_STOP_TIMEOUT, &mut worker).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "ledger worker ended abnormally"),
            Err(_) => {
                warn!("ledger still referenced at shutdown, stopping it");
                worker.abort();
            }
        }
        info!("background core stopped");
    }
}
