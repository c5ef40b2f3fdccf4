#[cfg(test)]
mod tests {
    use practime::libs::formatter::format_duration_ms;

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration_ms(0), "0s");
        assert_eq!(format_duration_ms(999), "0s");
        assert_eq!(format_duration_ms(59_999), "59s");
    }

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration_ms(60_000), "1m 0s");
        assert_eq!(format_duration_ms(5 * 60_000 + 3_000), "5m 3s");
        assert_eq!(format_duration_ms(3_599_999), "59m 59s");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration_ms(3_600_000), "1h 0m 0s");
        assert_eq!(format_duration_ms(2 * 3_600_000 + 9_000), "2h 0m 9s");
        assert_eq!(format_duration_ms(30 * 3_600_000 + 61_000), "30h 1m 1s");
    }
}
