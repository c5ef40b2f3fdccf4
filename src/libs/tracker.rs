//! The working-session state machine.
//!
//! A [`SessionTracker`] decides when time on a problem page counts. It holds
//! at most one open session and moves between three states:
//!
//! ```text
//!            start_tracking(tab)                 idle check (> 30s quiet)
//!   Idle ───────────────────────▶ Tracking ─────────────────────────────▶ Suspended
//!    ▲                              │  ▲                                      │
//!    │        stop_tracking()       │  │     record_activity() on a tab      │
//!    └──────────────────────────────┘  └──────── that is still trackable ─────┘
//! ```
//!
//! Leaving `Tracking` (or switching tabs inside it) flushes the elapsed span to
//! the [`Ledger`]. Flushes only enqueue the write, so every method here is
//! synchronous; ordering of the queued writes follows the order of calls.
//!
//! While `Tracking`, a tokio task polls [`SessionTracker::check_idle`] every
//! [`IDLE_CHECK_INTERVAL`]. The task exists only during that state: it is
//! spawned on entry and aborted on exit.

use crate::libs::accumulator::elapsed_ms;
use crate::libs::clock::Clock;
use crate::libs::ledger::{Ledger, PendingRecord};
use crate::libs::tabs::TabId;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Quiet period after which a tracked session is suspended.
pub const IDLE_THRESHOLD_MS: i64 = 30_000;

/// Period of the idle check while tracking.
pub const IDLE_CHECK_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerState {
    /// No session.
    Idle,
    /// Session open, user presumed active.
    Tracking,
    /// Session closed for inactivity; the tab is remembered for resuming.
    Suspended,
}

#[derive(Debug, Clone)]
struct Session {
    active_tab: Option<TabId>,
    start: Option<NaiveDateTime>,
    is_active: bool,
    last_activity: NaiveDateTime,
}

impl Session {
    fn state(&self) -> TrackerState {
        match (self.is_active, self.active_tab) {
            (true, _) => TrackerState::Tracking,
            (false, Some(_)) => TrackerState::Suspended,
            (false, None) => TrackerState::Idle,
        }
    }
}

struct TrackerInner {
    clock: Arc<dyn Clock>,
    ledger: Ledger,
    session: Mutex<Session>,
    idle_timer: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for TrackerInner {
    fn drop(&mut self) {
        if let Some(timer) = self.idle_timer.get_mut().take() {
            timer.abort();
        }
    }
}

/// Shared handle to the session state machine.
///
/// Clones refer to the same session.
#[derive(Clone)]
pub struct SessionTracker {
    inner: Arc<TrackerInner>,
}

impl SessionTracker {
    pub fn new(clock: Arc<dyn Clock>, ledger: Ledger) -> Self {
        let now = clock.now();
        Self {
            inner: Arc::new(TrackerInner {
                clock,
                ledger,
                session: Mutex::new(Session {
                    active_tab: None,
                    start: None,
                    is_active: false,
                    last_activity: now,
                }),
                idle_timer: Mutex::new(None),
            }),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    pub fn ledger(&self) -> &Ledger {
        &self.inner.ledger
    }

    pub fn state(&self) -> TrackerState {
        self.inner.session.lock().state()
    }

    pub fn is_active(&self) -> bool {
        self.inner.session.lock().is_active
    }

    /// Tab of the open or suspended session.
    pub fn active_tab(&self) -> Option<TabId> {
        self.inner.session.lock().active_tab
    }

    pub fn is_idle_timer_armed(&self) -> bool {
        self.inner.idle_timer.lock().is_some()
    }

    /// Opens a session on `tab`, flushing whatever was open before.
    ///
    /// Already tracking the same tab is a no-op.
    pub fn start_tracking(&self, tab: TabId) {
        let now = self.inner.clock.now();
        let mut session = self.inner.session.lock();
        if session.is_active && session.active_tab == Some(tab) {
            return;
        }

        info!(tab, previous = ?session.active_tab, "starting tracking");
        self.flush_locked(&mut session, now);
        *session = Session {
            active_tab: Some(tab),
            start: Some(now),
            is_active: true,
            last_activity: now,
        };
        self.arm_idle_timer();
    }

    /// Closes the session and forgets its tab.
    pub fn stop_tracking(&self) {
        let now = self.inner.clock.now();
        let mut session = self.inner.session.lock();
        match session.state() {
            TrackerState::Idle => return,
            TrackerState::Tracking => info!(tab = ?session.active_tab, "stopping tracking"),
            TrackerState::Suspended => debug!(tab = ?session.active_tab, "forgetting suspended session"),
        }

        self.flush_locked(&mut session, now);
        session.is_active = false;
        session.start = None;
        session.active_tab = None;
        self.disarm_idle_timer();
    }

    /// Suspends the session if no activity was seen for longer than
    /// [`IDLE_THRESHOLD_MS`]. Returns the state after the check.
    pub fn check_idle(&self) -> TrackerState {
        let now = self.inner.clock.now();
        let mut session = self.inner.session.lock();
        if session.is_active && (now - session.last_activity).num_milliseconds() > IDLE_THRESHOLD_MS {
            info!(tab = ?session.active_tab, "user went idle, suspending tracking");
            self.flush_locked(&mut session, now);
            session.is_active = false;
            session.start = None;
            self.disarm_idle_timer();
        }
        session.state()
    }

    /// Records an activity signal.
    ///
    /// Returns the remembered tab when the session is suspended, so the caller
    /// can check whether it is still worth resuming.
    pub fn touch(&self) -> Option<TabId> {
        let now = self.inner.clock.now();
        let mut session = self.inner.session.lock();
        session.last_activity = now;
        match session.state() {
            TrackerState::Suspended => session.active_tab,
            _ => None,
        }
    }

    /// Reopens a suspended session on `tab` with a fresh start time.
    ///
    /// Returns `false` if the session moved on while the caller was looking
    /// the tab up.
    pub fn resume(&self, tab: TabId) -> bool {
        let now = self.inner.clock.now();
        let mut session = self.inner.session.lock();
        if session.state() != TrackerState::Suspended || session.active_tab != Some(tab) {
            return false;
        }

        info!(tab, "resuming tracking after idle period");
        session.start = Some(now);
        session.is_active = true;
        session.last_activity = now;
        self.arm_idle_timer();
        true
    }

    /// Drops a suspended session whose tab is no longer trackable.
    pub fn forget(&self, tab: TabId) {
        let mut session = self.inner.session.lock();
        if session.state() == TrackerState::Suspended && session.active_tab == Some(tab) {
            debug!(tab, "suspended tab no longer trackable");
            session.active_tab = None;
        }
    }

    /// Flushes the open span without closing the session.
    pub fn flush(&self) {
        let now = self.inner.clock.now();
        let mut session = self.inner.session.lock();
        self.flush_locked(&mut session, now);
    }

    /// Elapsed time of the open session that has not been flushed yet.
    pub fn in_flight_ms(&self) -> u64 {
        let now = self.inner.clock.now();
        in_flight_locked(&self.inner.session.lock(), now)
    }

    /// Unflushed time, activity flag and a queued ledger snapshot, taken
    /// together under the session lock. Flushes also enqueue under that lock,
    /// so every span is counted exactly once: either it is in flight here or
    /// its write is ahead of the snapshot.
    pub fn live_view(&self) -> (u64, bool, PendingRecord) {
        let now = self.inner.clock.now();
        let session = self.inner.session.lock();
        let snapshot = self.inner.ledger.snapshot(now.date());
        (in_flight_locked(&session, now), session.is_active, snapshot)
    }

    /// Flushes the open span and stops the idle timer. The session stays
    /// recorded so a later boot starts clean from the persisted totals.
    pub fn dispose(&self) {
        self.flush();
        self.disarm_idle_timer();
    }

    fn flush_locked(&self, session: &mut Session, now: NaiveDateTime) {
        let Some(start) = session.start.filter(|_| session.is_active) else {
            return;
        };
        let elapsed = elapsed_ms(start, now);
        if elapsed == 0 {
            return;
        }

        debug!(elapsed_ms = elapsed, tab = ?session.active_tab, "flushing session time");
        self.inner.ledger.add_time(elapsed, now.date());
        session.start = Some(now);
    }

    fn arm_idle_timer(&self) {
        let mut slot = self.inner.idle_timer.lock();
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime, idle detection disabled for this session");
            return;
        };

        let tracker = Arc::downgrade(&self.inner);
        *slot = Some(runtime.spawn(poll_idle(tracker)));
    }

    fn disarm_idle_timer(&self) {
        if let Some(timer) = self.inner.idle_timer.lock().take() {
            timer.abort();
        }
    }
}

fn in_flight_locked(session: &Session, now: NaiveDateTime) -> u64 {
    match (session.is_active, session.start) {
        (true, Some(start)) => elapsed_ms(start, now),
        _ => 0,
    }
}

async fn poll_idle(tracker: Weak<TrackerInner>) {
    let mut interval = time::interval_at(Instant::now() + IDLE_CHECK_INTERVAL, IDLE_CHECK_INTERVAL);
    loop {
        interval.tick().await;
        let Some(inner) = tracker.upgrade() else {
            break;
        };
        if (SessionTracker { inner }).check_idle() != TrackerState::Tracking {
            break;
        }
    }
}
