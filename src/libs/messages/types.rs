/// Every user-facing message printed by the practime CLI.
///
/// Text lives in `display.rs`; call sites only pick a variant and pass the
/// values to interpolate.
#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleTracking,
    PromptTrackedPatterns,
    InvalidPattern(String, String), // pattern, error
    InvalidPatterns(String),
    NoPatternsConfigured,

    // === STATS MESSAGES ===
    StatsHeader(String), // date
    StatsActive,
    StatsInactive,
    NoData,
    TodayReset(String), // date

    // === SERVE MESSAGES ===
    ServeStarted(usize), // pattern count
    ServeInputClosed,
    ServeReceivedCtrlC,
    ServeStopped,
    ServeWriteFailed(String),
    FailedToCreateCtrlCHandler,

    // === STORAGE MESSAGES ===
    LedgerUnavailable(String),
}
