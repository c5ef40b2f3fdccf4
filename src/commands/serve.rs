//! Long-running background core driven by the browser host.
//!
//! The host writes one JSON signal per line to stdin (see
//! [`Signal`](crate::libs::router::Signal)). Signals that expect an answer
//! (`get-stats`, `reset-today`) get one JSON stats object per line on
//! stdout. Status lines go to stderr so stdout stays a clean data channel.
//!
//! Closing stdin is treated as the host suspending the process: the open
//! session is flushed and the ledger drained before exit. Ctrl+C does the
//! same.

use crate::db::storage::SqliteStore;
use crate::libs::background::Background;
use crate::libs::clock::SystemClock;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::router::{parse_signal, Signal};
use crate::libs::stats::Stats;
use crate::libs::tabs::TabTable;
use crate::{msg_error, msg_notice};
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::debug;

pub async fn cmd() -> Result<()> {
    let matcher = Config::read()?.matcher()?;
    msg_notice!(Message::ServeStarted(matcher.patterns().len()));

    let tabs = Arc::new(TabTable::new());
    let core = Background::boot(SqliteStore::new()?, tabs.clone(), matcher, Arc::new(SystemClock));

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ctrl_c_armed = true;

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let Some(signal) = parse_signal(&line) else { continue };
                    tabs.observe(&signal);
                    if let Some(stats) = core.router().dispatch(signal).await {
                        if let Err(err) = write_stats(&mut stdout, &stats).await {
                            msg_error!(Message::ServeWriteFailed(err.to_string()));
                            break;
                        }
                    }
                }
                Ok(None) => {
                    msg_notice!(Message::ServeInputClosed);
                    break;
                }
                Err(err) => {
                    debug!(error = %err, "stdin read failed");
                    msg_notice!(Message::ServeInputClosed);
                    break;
                }
            },
            result = &mut ctrl_c, if ctrl_c_armed => match result {
                Ok(()) => {
                    msg_notice!(Message::ServeReceivedCtrlC);
                    break;
                }
                Err(err) => {
                    debug!(error = %err, "ctrl_c listener failed");
                    msg_error!(Message::FailedToCreateCtrlCHandler);
                    ctrl_c_armed = false;
                }
            },
        }
    }

    core.router().dispatch(Signal::ProcessSuspending).await;
    core.shutdown().await;
    msg_notice!(Message::ServeStopped);
    Ok(())
}

async fn write_stats(stdout: &mut Stdout, stats: &Stats) -> Result<()> {
    let mut line = serde_json::to_vec(stats)?;
    line.push(b'\n');
    stdout.write_all(&line).await?;
    stdout.flush().await?;
    Ok(())
}
