#[cfg(test)]
mod tests {
    use practime::db::db::DB_FILE_NAME;
    use practime::db::storage::{LedgerError, LedgerStore, SqliteStore};
    use practime::libs::accumulator::LedgerRecord;
    use practime::libs::ledger::Ledger;
    use rusqlite::{params, Connection};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    /// Each test gets its own database file.
    struct StoreTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl AsyncTestContext for StoreTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join(DB_FILE_NAME);
            StoreTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    fn sample() -> LedgerRecord {
        LedgerRecord {
            total_time_ms: 1_234,
            today_time_ms: 234,
            last_date_key: "2024-01-01".to_string(),
            total_run_clicks: 3,
            total_submit_clicks: 2,
            today_run_clicks: 1,
            today_submit_clicks: 0,
        }
    }

    fn insert_raw(path: &Path, key: &str, value: &str) {
        let conn = Connection::open(path).unwrap();
        conn.execute(
            "INSERT INTO storage (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .unwrap();
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_empty_store_reads_none(ctx: &mut StoreTestContext) {
        let store = SqliteStore::open(&ctx.db_path).unwrap();
        assert!(store.read().await.unwrap().is_none());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_write_survives_reopen(ctx: &mut StoreTestContext) {
        SqliteStore::open(&ctx.db_path).unwrap().write(&sample()).await.unwrap();

        let reopened = SqliteStore::open(&ctx.db_path).unwrap();
        assert_eq!(reopened.read().await.unwrap(), Some(sample()));
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_values_use_extension_keys(ctx: &mut StoreTestContext) {
        let store = SqliteStore::open(&ctx.db_path).unwrap();
        store.write(&sample()).await.unwrap();

        assert_eq!(store.raw_value("totalTime").unwrap().as_deref(), Some("1234"));
        assert_eq!(store.raw_value("todayRunClicks").unwrap().as_deref(), Some("1"));
        assert_eq!(store.raw_value("lastDate").unwrap().as_deref(), Some("\"2024-01-01\""));
        assert_eq!(store.raw_value("total_time_ms").unwrap(), None);
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_partial_store_defaults_missing_keys(ctx: &mut StoreTestContext) {
        SqliteStore::open(&ctx.db_path).unwrap();
        insert_raw(&ctx.db_path, "totalTime", "5000");
        insert_raw(&ctx.db_path, "lastDate", "\"2024-02-10\"");

        let record = SqliteStore::open(&ctx.db_path).unwrap().read().await.unwrap().unwrap();
        assert_eq!(record.total_time_ms, 5_000);
        assert_eq!(record.today_time_ms, 0);
        assert_eq!(record.total_run_clicks, 0);
        assert_eq!(record.last_date_key, "2024-02-10");
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_corrupt_value_is_reported(ctx: &mut StoreTestContext) {
        SqliteStore::open(&ctx.db_path).unwrap();
        insert_raw(&ctx.db_path, "todayTime", "not-a-number");

        let err = SqliteStore::open(&ctx.db_path).unwrap().read().await.unwrap_err();
        assert!(matches!(err, LedgerError::Decode { ref key, .. } if key == "todayTime"));
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_ledger_over_sqlite(ctx: &mut StoreTestContext) {
        let (ledger, _worker) = Ledger::spawn(SqliteStore::open(&ctx.db_path).unwrap());
        let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ledger.initialize(today);
        ledger.add_time(2_000, today);
        ledger.add_time(500, today);
        ledger.sync(today).await.unwrap();

        let record = SqliteStore::open(&ctx.db_path).unwrap().read().await.unwrap().unwrap();
        assert_eq!(record.total_time_ms, 2_500);
        assert_eq!(record.last_date_key, "2024-01-01");
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_in_memory_store_round_trip(_ctx: &mut StoreTestContext) {
        let store = SqliteStore::in_memory().unwrap();
        store.write(&LedgerRecord::default()).await.unwrap();
        store.write(&sample()).await.unwrap();

        assert_eq!(store.read().await.unwrap(), Some(sample()));
    }
}
