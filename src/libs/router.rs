//! Dispatch of browser signals to the tracking core.
//!
//! Signals arrive as JSON objects tagged by `type`, one per host event. The
//! router owns no state of its own: it resolves tabs through the
//! [`TabLookup`], classifies URLs, and calls into the tracker, the activity
//! monitor, the ledger, or the query service. Unknown tabs and windows are
//! ignored rather than reported.
//!
//! ## Signals
//!
//! | `type`                 | effect                                               |
//! |------------------------|------------------------------------------------------|
//! | `tab-activated`        | classify the tab's URL, start or stop tracking       |
//! | `tab-url-changed`      | classify the new URL, start or stop tracking         |
//! | `tab-removed`          | stop if it was the tracked tab                       |
//! | `window-focus-changed` | no window: activity; else classify its active tab    |
//! | `process-suspending`   | flush and wait for the ledger to drain               |
//! | `process-starting`     | classify the current active tab                      |
//! | `installed`            | create a zeroed ledger if none exists                |
//! | `user-activity`        | refresh activity, maybe resume                       |
//! | `button-click`         | count a run or submit click                          |
//! | `get-stats`            | reply with [`Stats`]                                 |
//! | `reset-today`          | zero today's counters, reply with [`Stats`]          |

use crate::libs::accumulator::ClickKind;
use crate::libs::monitor::ActivityMonitor;
use crate::libs::stats::{QueryService, Stats};
use crate::libs::tabs::{TabId, TabInfo, TabLookup, WindowId};
use crate::libs::tracker::SessionTracker;
use crate::libs::url_matcher::UrlMatcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An event from the browser host or the extension's other processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Signal {
    #[serde(rename_all = "camelCase")]
    TabActivated {
        tab_id: TabId,
        #[serde(default)]
        window_id: Option<WindowId>,
    },
    #[serde(rename_all = "camelCase")]
    TabUrlChanged { tab_id: TabId, url: String },
    #[serde(rename_all = "camelCase")]
    TabRemoved { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    WindowFocusChanged {
        #[serde(default)]
        window_id: Option<WindowId>,
    },
    ProcessSuspending,
    ProcessStarting,
    Installed,
    #[serde(alias = "user_activity")]
    UserActivity,
    #[serde(alias = "button_click", rename_all = "camelCase")]
    ButtonClick { button_type: ClickKind },
    #[serde(alias = "get_time_stats")]
    GetStats,
    ResetToday,
}

/// Parses one host message.
///
/// Malformed payloads are logged and dropped.
pub fn parse_signal(line: &str) -> Option<Signal> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(signal) => Some(signal),
        Err(err) => {
            warn!(error = %err, payload = line, "ignoring malformed signal");
            None
        }
    }
}

pub struct EventRouter<T: TabLookup> {
    tracker: SessionTracker,
    monitor: ActivityMonitor<T>,
    queries: QueryService,
    tabs: Arc<T>,
    matcher: Arc<UrlMatcher>,
}

impl<T: TabLookup> EventRouter<T> {
    pub fn new(tracker: SessionTracker, tabs: Arc<T>, matcher: Arc<UrlMatcher>) -> Self {
        Self {
            monitor: ActivityMonitor::new(tracker.clone(), tabs.clone(), matcher.clone()),
            queries: QueryService::new(tracker.clone()),
            tracker,
            tabs,
            matcher,
        }
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn queries(&self) -> &QueryService {
        &self.queries
    }

    /// Routes one signal. Returns a response for signals that expect one.
    pub async fn dispatch(&self, signal: Signal) -> Option<Stats> {
        debug!(?signal, "dispatching signal");
        match signal {
            Signal::TabActivated { tab_id, .. } => {
                let tab = self.tabs.tab(tab_id).await;
                self.classify(tab);
            }
            Signal::TabUrlChanged { tab_id, url } => self.handle_tab_change(Some(&url), tab_id),
            Signal::TabRemoved { tab_id } => {
                if self.tracker.active_tab() == Some(tab_id) {
                    self.tracker.stop_tracking();
                }
            }
            Signal::WindowFocusChanged { window_id: None } => self.monitor.record_activity().await,
            Signal::WindowFocusChanged { window_id: Some(window_id) } => {
                let tab = self.tabs.active_tab_in_window(window_id).await;
                self.classify(tab);
            }
            Signal::ProcessSuspending => {
                info!("process suspending, saving time");
                self.tracker.flush();
                let today = self.tracker.clock().today();
                if let Err(err) = self.tracker.ledger().sync(today).await {
                    warn!(error = %err, "could not confirm final flush");
                }
            }
            Signal::ProcessStarting => {
                let tab = self.tabs.current_active_tab().await;
                self.classify(tab);
            }
            Signal::Installed => {
                let today = self.tracker.clock().today();
                self.tracker.ledger().initialize(today);
            }
            Signal::UserActivity => self.monitor.record_activity().await,
            Signal::ButtonClick { button_type } => {
                debug!(kind = %button_type, "button click tracked");
                let today = self.tracker.clock().today();
                self.tracker.ledger().add_click(button_type, today);
            }
            Signal::GetStats => return self.stats().await,
            Signal::ResetToday => {
                let today = self.tracker.clock().today();
                if let Err(err) = self.tracker.ledger().reset_today(today).await {
                    warn!(error = %err, "reset of today's stats failed");
                    return None;
                }
                return self.stats().await;
            }
        }
        None
    }

    async fn stats(&self) -> Option<Stats> {
        match self.queries.get_stats().await {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!(error = %err, "stats query failed");
                None
            }
        }
    }

    fn classify(&self, tab: Option<TabInfo>) {
        match tab {
            Some(tab) => self.handle_tab_change(tab.url.as_deref(), tab.id),
            None => debug!("tab no longer exists, ignoring"),
        }
    }

    fn handle_tab_change(&self, url: Option<&str>, tab_id: TabId) {
        if url.is_some_and(|url| self.matcher.is_trackable(url)) {
            self.tracker.start_tracking(tab_id);
        } else {
            self.tracker.stop_tracking();
        }
    }
}
