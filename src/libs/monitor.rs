//! User activity intake.
//!
//! The page-side observer reports input events; each one refreshes the
//! tracker's last-activity time. Suspended sessions are resumed here, after
//! checking that the remembered tab still shows a problem page.

use crate::libs::tabs::TabLookup;
use crate::libs::tracker::SessionTracker;
use crate::libs::url_matcher::UrlMatcher;
use std::sync::Arc;
use tracing::debug;

pub struct ActivityMonitor<T: TabLookup> {
    tracker: SessionTracker,
    tabs: Arc<T>,
    matcher: Arc<UrlMatcher>,
}

impl<T: TabLookup> ActivityMonitor<T> {
    pub fn new(tracker: SessionTracker, tabs: Arc<T>, matcher: Arc<UrlMatcher>) -> Self {
        Self { tracker, tabs, matcher }
    }

    /// Handles one activity signal.
    ///
    /// The tab lookup is best-effort: if the tab is gone the signal only
    /// refreshes the activity time.
    pub async fn record_activity(&self) {
        let Some(tab_id) = self.tracker.touch() else {
            return;
        };

        let Some(tab) = self.tabs.tab(tab_id).await else {
            debug!(tab = tab_id, "suspended tab no longer exists, ignoring activity");
            return;
        };

        let trackable = tab.url.as_deref().is_some_and(|url| self.matcher.is_trackable(url));
        if trackable {
            self.tracker.resume(tab_id);
        } else {
            self.tracker.forget(tab_id);
        }
    }
}
