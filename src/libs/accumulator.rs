//! Pure merge rules for the usage ledger.
//!
//! Every durable change goes through one of the functions here: they take the
//! freshest stored [`LedgerRecord`], the current calendar day, and return the
//! record to write back. None of them touch storage, which keeps the
//! read-merge-write cycle in [`crate::libs::ledger`] the only place that does.
//!
//! ## Rollover
//!
//! Day-scoped counters (`todayTime`, `todayRunClicks`, `todaySubmitClicks`)
//! belong to the day named by `lastDate`. When a merge runs on a different day
//! they are zeroed before anything is added. Totals never roll over.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of the stored `lastDate` key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// The persisted usage counters.
///
/// Field names on the wire match the extension's storage keys byte-for-byte.
/// Missing keys decode as zero so partially written stores from older installs
/// still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerRecord {
    #[serde(rename = "totalTime")]
    pub total_time_ms: u64,
    #[serde(rename = "todayTime")]
    pub today_time_ms: u64,
    #[serde(rename = "lastDate")]
    pub last_date_key: String,
    #[serde(rename = "totalRunClicks")]
    pub total_run_clicks: u64,
    #[serde(rename = "totalSubmitClicks")]
    pub total_submit_clicks: u64,
    #[serde(rename = "todayRunClicks")]
    pub today_run_clicks: u64,
    #[serde(rename = "todaySubmitClicks")]
    pub today_submit_clicks: u64,
}

impl LedgerRecord {
    /// A zeroed record stamped with `today`, as written on first install.
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            last_date_key: day_key(today),
            ..Self::default()
        }
    }
}

/// Which button the page-side observer saw clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickKind {
    Run,
    Submit,
}

impl fmt::Display for ClickKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickKind::Run => write!(f, "run"),
            ClickKind::Submit => write!(f, "submit"),
        }
    }
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Milliseconds between `start` and `now`, clamped at zero if the clock went
/// backwards.
pub fn elapsed_ms(start: NaiveDateTime, now: NaiveDateTime) -> u64 {
    (now - start).num_milliseconds().max(0) as u64
}

/// Zeroes the day-scoped counters if `record` belongs to another day.
///
/// Returns `true` when anything changed.
pub fn roll_over(record: &mut LedgerRecord, today: NaiveDate) -> bool {
    let key = day_key(today);
    if record.last_date_key == key {
        return false;
    }
    record.today_time_ms = 0;
    record.today_run_clicks = 0;
    record.today_submit_clicks = 0;
    record.last_date_key = key;
    true
}

/// Adds a flushed session span to both time counters.
pub fn add_elapsed(mut record: LedgerRecord, elapsed_ms: u64, today: NaiveDate) -> LedgerRecord {
    roll_over(&mut record, today);
    record.total_time_ms = record.total_time_ms.saturating_add(elapsed_ms);
    record.today_time_ms = record.today_time_ms.saturating_add(elapsed_ms);
    record
}

pub fn add_click(mut record: LedgerRecord, kind: ClickKind, today: NaiveDate) -> LedgerRecord {
    roll_over(&mut record, today);
    match kind {
        ClickKind::Run => {
            record.total_run_clicks += 1;
            record.today_run_clicks += 1;
        }
        ClickKind::Submit => {
            record.total_submit_clicks += 1;
            record.today_submit_clicks += 1;
        }
    }
    record
}

/// Manual reset from the UI: today's counters only, totals are kept.
pub fn reset_today(mut record: LedgerRecord, today: NaiveDate) -> LedgerRecord {
    record.today_time_ms = 0;
    record.today_run_clicks = 0;
    record.today_submit_clicks = 0;
    record.last_date_key = day_key(today);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn record_for(d: u32) -> LedgerRecord {
        LedgerRecord {
            total_time_ms: 10_000,
            today_time_ms: 4_000,
            last_date_key: day_key(day(d)),
            total_run_clicks: 7,
            total_submit_clicks: 2,
            today_run_clicks: 3,
            today_submit_clicks: 1,
        }
    }

    #[test]
    fn rollover_zeroes_today_but_keeps_totals() {
        let merged = add_elapsed(record_for(1), 500, day(2));

        assert_eq!(merged.total_time_ms, 10_500);
        assert_eq!(merged.today_time_ms, 500);
        assert_eq!(merged.today_run_clicks, 0);
        assert_eq!(merged.today_submit_clicks, 0);
        assert_eq!(merged.total_run_clicks, 7);
        assert_eq!(merged.last_date_key, "2024-01-02");
    }

    #[test]
    fn same_day_adds_on_top() {
        let merged = add_elapsed(record_for(1), 500, day(1));
        assert_eq!(merged.today_time_ms, 4_500);
        assert_eq!(merged.total_time_ms, 10_500);
    }

    #[test]
    fn roll_over_reports_change_once() {
        let mut record = record_for(1);
        assert!(roll_over(&mut record, day(2)));
        assert!(!roll_over(&mut record, day(2)));
    }

    #[test]
    fn click_rollover_matches_time_rollover() {
        let merged = add_click(record_for(1), ClickKind::Submit, day(3));
        assert_eq!(merged.today_submit_clicks, 1);
        assert_eq!(merged.total_submit_clicks, 3);
        assert_eq!(merged.today_time_ms, 0);
        assert_eq!(merged.total_time_ms, 10_000);
    }

    #[test]
    fn reset_today_keeps_totals() {
        let reset = reset_today(record_for(1), day(1));
        assert_eq!(reset.today_time_ms, 0);
        assert_eq!(reset.today_run_clicks, 0);
        assert_eq!(reset.total_time_ms, 10_000);
        assert_eq!(reset.total_run_clicks, 7);
    }

    #[test]
    fn elapsed_is_clamped_at_zero() {
        let later = day(1).and_hms_opt(10, 0, 0).unwrap();
        let earlier = day(1).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(elapsed_ms(later, earlier), 0);
        assert_eq!(elapsed_ms(earlier, later), 3_600_000);
    }

    #[test]
    fn wire_names_are_preserved() {
        let json = serde_json::to_value(record_for(1)).unwrap();
        for key in [
            "totalTime",
            "todayTime",
            "lastDate",
            "totalRunClicks",
            "totalSubmitClicks",
            "todayRunClicks",
            "todaySubmitClicks",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn missing_keys_decode_as_zero() {
        let record: LedgerRecord = serde_json::from_str(r#"{"totalTime": 42}"#).unwrap();
        assert_eq!(record.total_time_ms, 42);
        assert_eq!(record.today_run_clicks, 0);
        assert!(record.last_date_key.is_empty());
    }
}
