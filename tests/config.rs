#[cfg(test)]
mod tests {
    use practime::libs::config::{Config, TrackingConfig, CONFIG_FILE_NAME};
    use practime::libs::data_storage::DataStorage;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // The data directory comes from HOME, which is process-wide.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Points the user's home/appdata directory at a fresh temporary directory.
    struct ConfigTestContext {
        _guard: MutexGuard<'static, ()>,
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext {
                _guard: guard,
                _temp_dir: temp_dir,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(_ctx: &mut ConfigTestContext) {
        let config = Config::read().unwrap();
        assert!(config.tracking.is_none());
        assert_eq!(config.tracking(), TrackingConfig::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_default_matcher_tracks_problem_sites(_ctx: &mut ConfigTestContext) {
        let matcher = Config::default().matcher().unwrap();
        assert!(matcher.is_trackable("https://leetcode.com/problems/add-two-numbers/"));
        assert!(matcher.is_trackable("https://www.geeksforgeeks.org/problems/stack-using-two-queues/1"));
        assert!(!matcher.is_trackable("https://leetcode.com/explore/"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(_ctx: &mut ConfigTestContext) {
        let config = Config {
            tracking: Some(TrackingConfig {
                patterns: vec![r"codeforces\.com/problemset/problem/".to_string()],
            }),
        };
        config.save().unwrap();

        let read_config = Config::read().unwrap();
        assert_eq!(read_config.tracking, config.tracking);

        let matcher = read_config.matcher().unwrap();
        assert!(matcher.is_trackable("https://codeforces.com/problemset/problem/1/A"));
        assert!(!matcher.is_trackable("https://leetcode.com/problems/two-sum/"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_section_is_not_written(_ctx: &mut ConfigTestContext) {
        Config::default().save().unwrap();

        let path = DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.trim(), "{}");
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_pattern_is_rejected(_ctx: &mut ConfigTestContext) {
        let config = Config {
            tracking: Some(TrackingConfig {
                patterns: vec![r"leetcode\.com/problems/".to_string(), "([unclosed".to_string()],
            }),
        };

        let err = config.matcher().unwrap_err().to_string();
        assert!(err.starts_with("❌ Invalid tracked pattern:"));
        assert!(err.contains("unclosed"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_empty_pattern_list_tracks_nothing(_ctx: &mut ConfigTestContext) {
        let config = Config {
            tracking: Some(TrackingConfig { patterns: vec![] }),
        };

        let matcher = config.matcher().unwrap();
        assert!(!matcher.is_trackable("https://leetcode.com/problems/two-sum/"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_delete_config(_ctx: &mut ConfigTestContext) {
        assert!(!Config::delete().unwrap());

        Config::default().save().unwrap();
        assert!(Config::delete().unwrap());
        assert!(Config::read().unwrap().tracking.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_malformed_config_is_an_error(_ctx: &mut ConfigTestContext) {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(path, "{ not json").unwrap();

        assert!(Config::read().is_err());
    }
}
