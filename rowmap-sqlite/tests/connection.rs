#[cfg(test)]
mod tests {
    use rowmap_core::{Connection, Executor, QueryResult, Value, stream::TryStreamExt};
    use rowmap_sqlite::SqliteConnection;
    use rowmap_tests::{init_logs, silent_logs};
    use std::{path::Path, sync::Mutex};
    use tokio::fs;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn create_database() {
        init_logs();
        const DB_PATH: &'static str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .await
                .expect(format!("Failed to remove test database file {}", DB_PATH).as_str());
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .await
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .await
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .await
            .expect(format!("Failed to remove existing test database file {}", DB_PATH).as_str());
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
                    .await
                    .is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(SqliteConnection::connect("duckdb://some_value").await.is_err());
            assert!(SqliteConnection::connect("sqlite://file.sqlite?mode=rwx").await.is_err());
        };
    }

    #[tokio::test]
    async fn run_statements() {
        init_logs();
        let mut connection = SqliteConnection::connect("sqlite::memory:")
            .await
            .expect("Could not open the in memory database");
        connection
            .execute("CREATE TABLE t (a INTEGER, b TEXT, c REAL, d BLOB);".into())
            .await
            .expect("Could not create the table");
        let result = connection
            .execute("INSERT INTO t (a, b, c, d) VALUES (1, 'x', 0.5, X'CAFE'), (2, NULL, NULL, NULL);".into())
            .await
            .expect("Could not insert the rows");
        assert_eq!(result.rows_affected, 2);
        assert_eq!(result.last_affected_id, Some(2));

        let rows = connection
            .fetch("SELECT a, b, c, d FROM t ORDER BY a;".into())
            .try_collect::<Vec<_>>()
            .await
            .expect("Could not select the rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].names(), &["a", "b", "c", "d"]);
        assert_eq!(
            rows[0].values(),
            &[
                Value::Int64(Some(1)),
                Value::Varchar(Some("x".into())),
                Value::Float64(Some(0.5)),
                Value::Blob(Some([0xCA, 0xFE].into())),
            ]
        );
        assert!(rows[1].values()[1..].iter().all(Value::is_null));

        let results = connection
            .run("DELETE FROM t WHERE a = 1;".into())
            .try_collect::<Vec<_>>()
            .await
            .expect("Could not delete");
        assert!(matches!(
            results.as_slice(),
            [QueryResult::Affected(v)] if v.rows_affected == 1 && v.last_affected_id.is_none()
        ));

        silent_logs! {
            assert!(
                connection
                    .execute("SELECT * FROM missing_table;".into())
                    .await
                    .is_err()
            );
        }
    }
}
