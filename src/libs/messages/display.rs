//! Display text for practime messages.
//!
//! All user-facing wording is kept in this one match so call sites stay free
//! of string literals and every message reads in the same voice.
//!
//! ## Usage Integration
//!
//! ```rust
//! use practime::libs::messages::Message;
//! use practime::{msg_info, msg_success};
//!
//! msg_success!(Message::ConfigSaved);
//! msg_info!(Message::NoData);
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed, default patterns will be used".to_string(),
            Message::ConfigNotFound => "No configuration file found, nothing to remove".to_string(),
            Message::ConfigModuleTracking => "Tracked pages".to_string(),
            Message::PromptTrackedPatterns => "URL patterns to track (regular expressions, comma separated)".to_string(),
            Message::InvalidPattern(pattern, error) => format!("Invalid pattern '{}': {}", pattern, error),
            Message::InvalidPatterns(error) => format!("Invalid tracked pattern: {}", error),
            Message::NoPatternsConfigured => "No patterns configured, nothing will be tracked".to_string(),

            // === STATS MESSAGES ===
            Message::StatsHeader(date) => format!("Practice time for {}", date),
            Message::StatsActive => "Actively tracking".to_string(),
            Message::StatsInactive => "Not tracking".to_string(),
            Message::NoData => "No data available".to_string(),
            Message::TodayReset(date) => format!("Today's time and click counts reset ({})", date),

            // === SERVE MESSAGES ===
            Message::ServeStarted(count) => format!("Background core running with {} tracked pattern(s)", count),
            Message::ServeInputClosed => "Host closed the signal stream, shutting down".to_string(),
            Message::ServeReceivedCtrlC => "Received Ctrl+C, shutting down".to_string(),
            Message::ServeStopped => "Background core stopped".to_string(),
            Message::ServeWriteFailed(error) => format!("Failed to write response to host: {}", error),
            Message::FailedToCreateCtrlCHandler => "Failed to listen for Ctrl+C".to_string(),

            // === STORAGE MESSAGES ===
            Message::LedgerUnavailable(error) => format!("Ledger unavailable: {}", error),
        };

        write!(f, "{}", text)
    }
}
