use std::path::Path;

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

const CREATE_EMPLOYEES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        position TEXT NOT NULL,
        salary REAL NOT NULL
    );
"#;

const CREATE_EMPLOYEES_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_employees_name ON employees (name);";

/// Opens (creating if needed) the SQLite file and bootstraps the schema.
/// The returned connection is a pool; callers keep it in application state.
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}

/// Minimal schema bootstrap, safe to run on every start
pub async fn bootstrap_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for sql in [CREATE_EMPLOYEES_TABLE, CREATE_EMPLOYEES_NAME_INDEX] {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    Ok(())
}

/// Private in-memory database with the schema applied.
/// One pooled connection, otherwise every connection sees its own empty database.
#[cfg(test)]
pub async fn memory_database() -> DatabaseConnection {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await.unwrap();
    bootstrap_schema(&conn).await.unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let conn = memory_database().await;
        bootstrap_schema(&conn).await.unwrap();

        let rows = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name='employees';"
                    .to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
