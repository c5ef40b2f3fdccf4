//! Duration formatting for user-facing output.
//!
//! Tracked time is stored in milliseconds; people read it as hours, minutes
//! and seconds. The format drops leading zero units so short practice
//! sessions stay compact.
//!
//! ## Format Specifications
//!
//! - under a minute → `"42s"`
//! - under an hour → `"5m 3s"`
//! - otherwise → `"2h 0m 9s"`
//!
//! Sub-second remainders are truncated.
//!
//! ## Examples
//!
//! ```rust
//! use practime::libs::formatter::format_duration_ms;
//!
//! assert_eq!(format_duration_ms(42_900), "42s");
//! assert_eq!(format_duration_ms(303_000), "5m 3s");
//! assert_eq!(format_duration_ms(7_209_000), "2h 0m 9s");
//! ```

/// Formats a millisecond count as `Hh Mm Ss`, omitting leading zero units.
pub fn format_duration_ms(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    match (hours, minutes) {
        (0, 0) => format!("{}s", seconds),
        (0, _) => format!("{}m {}s", minutes, seconds),
        _ => format!("{}h {}m {}s", hours, minutes, seconds),
    }
}
