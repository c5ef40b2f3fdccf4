use crate::db::storage::SqliteStore;
use crate::libs::background::Background;
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::router::Signal;
use crate::libs::tabs::TabTable;
use crate::libs::view::View;
use crate::msg_bail_anyhow;
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Print the stats object as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub async fn cmd(args: StatsArgs) -> Result<()> {
    let clock = Arc::new(SystemClock);
    let today = clock.today();
    let core = Background::boot(SqliteStore::new()?, Arc::new(TabTable::new()), Config::read()?.matcher()?, clock);
    let stats = core.router().dispatch(Signal::GetStats).await;
    core.shutdown().await;

    let Some(stats) = stats else {
        msg_bail_anyhow!(Message::NoData);
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        View::stats(&stats, today)?;
    }
    Ok(())
}
