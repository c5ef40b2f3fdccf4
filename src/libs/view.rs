use super::formatter::format_duration_ms;
use super::stats::Stats;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use chrono::NaiveDate;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Prints a stats table for `date`, followed by the tracking status.
    pub fn stats(stats: &Stats, date: NaiveDate) -> Result<()> {
        msg_print!(Message::StatsHeader(date.format("%B %-d, %Y").to_string()), true);

        let mut table = Table::new();
        table.add_row(row!["", "TODAY", "TOTAL"]);
        table.add_row(row![
            "Time",
            format_duration_ms(stats.today_time_ms),
            format_duration_ms(stats.total_time_ms)
        ]);
        table.add_row(row!["Run clicks", stats.today_run_clicks, stats.total_run_clicks]);
        table.add_row(row!["Submit clicks", stats.today_submit_clicks, stats.total_submit_clicks]);
        table.printstd();

        let status = if stats.is_active { Message::StatsActive } else { Message::StatsInactive };
        msg_print!(status);

        Ok(())
    }
}
