//! Browser tab and window lookups.
//!
//! The tracking core never owns tab state. It asks a [`TabLookup`] what a tab
//! currently shows, and a missing answer is a normal outcome: tabs close and
//! windows vanish between an event firing and the lookup running.

use crate::libs::router::Signal;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;

pub type TabId = i64;
pub type WindowId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    pub window_id: Option<WindowId>,
    pub url: Option<String>,
}

/// Host-side tab queries. Every lookup is best-effort.
pub trait TabLookup: Send + Sync + 'static {
    fn tab(&self, tab_id: TabId) -> impl Future<Output = Option<TabInfo>> + Send;

    fn active_tab_in_window(&self, window_id: WindowId) -> impl Future<Output = Option<TabInfo>> + Send;

    /// Active tab of the focused window.
    fn current_active_tab(&self) -> impl Future<Output = Option<TabInfo>> + Send;
}

#[derive(Debug, Default)]
struct TabTableInner {
    tabs: HashMap<TabId, TabInfo>,
    active_by_window: HashMap<WindowId, TabId>,
    focused_window: Option<WindowId>,
    last_activated: Option<TabId>,
}

/// Mirror of the host's tabs built from the signals it sends.
///
/// Used when the core runs out of process and the host can only push events,
/// not answer queries.
#[derive(Debug, Default)]
pub struct TabTable {
    inner: Mutex<TabTableInner>,
}

impl TabTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the mirror from a host signal. Call before routing it.
    pub fn observe(&self, signal: &Signal) {
        let mut inner = self.inner.lock();
        match signal {
            Signal::TabActivated { tab_id, window_id } => {
                let entry = inner.tabs.entry(*tab_id).or_insert_with(|| TabInfo {
                    id: *tab_id,
                    window_id: *window_id,
                    url: None,
                });
                if window_id.is_some() {
                    entry.window_id = *window_id;
                }
                if let Some(window_id) = window_id {
                    inner.active_by_window.insert(*window_id, *tab_id);
                }
                inner.last_activated = Some(*tab_id);
            }
            Signal::TabUrlChanged { tab_id, url } => {
                inner
                    .tabs
                    .entry(*tab_id)
                    .and_modify(|tab| tab.url = Some(url.clone()))
                    .or_insert_with(|| TabInfo {
                        id: *tab_id,
                        window_id: None,
                        url: Some(url.clone()),
                    });
            }
            Signal::TabRemoved { tab_id } => {
                inner.tabs.remove(tab_id);
                inner.active_by_window.retain(|_, active| active != tab_id);
                if inner.last_activated == Some(*tab_id) {
                    inner.last_activated = None;
                }
            }
            Signal::WindowFocusChanged { window_id } => {
                inner.focused_window = *window_id;
            }
            _ => {}
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TabLookup for TabTable {
    async fn tab(&self, tab_id: TabId) -> Option<TabInfo> {
        self.inner.lock().tabs.get(&tab_id).cloned()
    }

    async fn active_tab_in_window(&self, window_id: WindowId) -> Option<TabInfo> {
        let inner = self.inner.lock();
        let tab_id = inner.active_by_window.get(&window_id)?;
        inner.tabs.get(tab_id).cloned()
    }

    async fn current_active_tab(&self) -> Option<TabInfo> {
        let inner = self.inner.lock();
        let tab_id = inner
            .focused_window
            .and_then(|window| inner.active_by_window.get(&window).copied())
            .or(inner.last_activated)?;
        inner.tabs.get(&tab_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(tab_id: TabId, url: &str) -> Signal {
        Signal::TabUrlChanged {
            tab_id,
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn focused_window_decides_current_tab() {
        let table = TabTable::new();
        table.observe(&url(1, "https://leetcode.com/problems/two-sum/"));
        table.observe(&url(2, "https://example.com/"));
        table.observe(&Signal::TabActivated { tab_id: 1, window_id: Some(10) });
        table.observe(&Signal::TabActivated { tab_id: 2, window_id: Some(20) });
        table.observe(&Signal::WindowFocusChanged { window_id: Some(10) });

        assert_eq!(table.current_active_tab().await.map(|t| t.id), Some(1));
        assert_eq!(table.active_tab_in_window(20).await.map(|t| t.id), Some(2));
    }

    #[tokio::test]
    async fn removed_tab_no_longer_resolves() {
        let table = TabTable::new();
        table.observe(&url(1, "https://leetcode.com/problems/two-sum/"));
        table.observe(&Signal::TabActivated { tab_id: 1, window_id: Some(10) });
        table.observe(&Signal::TabRemoved { tab_id: 1 });

        assert!(table.tab(1).await.is_none());
        assert!(table.active_tab_in_window(10).await.is_none());
        assert!(table.is_empty());
    }
}
