use crate::db::storage::SqliteStore;
use crate::libs::background::Background;
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::router::Signal;
use crate::libs::tabs::TabTable;
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_success};
use anyhow::Result;
use std::sync::Arc;

/// Zeroes today's time and click counts. Totals are kept.
pub async fn cmd() -> Result<()> {
    let clock = Arc::new(SystemClock);
    let today = clock.today();
    let core = Background::boot(SqliteStore::new()?, Arc::new(TabTable::new()), Config::read()?.matcher()?, clock);
    let stats = core.router().dispatch(Signal::ResetToday).await;
    core.shutdown().await;

    let Some(stats) = stats else {
        msg_bail_anyhow!(Message::LedgerUnavailable("reset was not stored".to_string()));
    };
    msg_success!(Message::TodayReset(today.format("%Y-%m-%d").to_string()));
    View::stats(&stats, today)
}
