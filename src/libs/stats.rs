//! Read path for usage statistics.

use crate::db::storage::LedgerError;
use crate::libs::accumulator::LedgerRecord;
use crate::libs::tracker::SessionTracker;
use serde::{Deserialize, Serialize};

/// Point-in-time usage figures reported to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_time_ms: u64,
    pub today_time_ms: u64,
    pub is_active: bool,
    pub total_run_clicks: u64,
    pub total_submit_clicks: u64,
    pub today_run_clicks: u64,
    pub today_submit_clicks: u64,
}

impl Stats {
    /// Stored figures plus `in_flight_ms` of unflushed session time.
    pub fn from_record(record: &LedgerRecord, in_flight_ms: u64, is_active: bool) -> Self {
        Self {
            total_time_ms: record.total_time_ms.saturating_add(in_flight_ms),
            today_time_ms: record.today_time_ms.saturating_add(in_flight_ms),
            is_active,
            total_run_clicks: record.total_run_clicks,
            total_submit_clicks: record.total_submit_clicks,
            today_run_clicks: record.today_run_clicks,
            today_submit_clicks: record.today_submit_clicks,
        }
    }
}

#[derive(Clone)]
pub struct QueryService {
    tracker: SessionTracker,
}

impl QueryService {
    pub fn new(tracker: SessionTracker) -> Self {
        Self { tracker }
    }

    /// Live statistics: stored totals with the day rollover applied, plus the
    /// open session's elapsed time. Nothing is flushed.
    ///
    /// The in-flight reading is taken when the snapshot is queued, not when it
    /// returns, so a flush landing while storage is slow cannot make the
    /// figures go backwards.
    pub async fn get_stats(&self) -> Result<Stats, LedgerError> {
        let (in_flight_ms, is_active, snapshot) = self.tracker.live_view();
        let record = snapshot.wait().await?;
        Ok(Stats::from_record(&record, in_flight_ms, is_active))
    }
}
