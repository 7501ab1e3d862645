use libsql::Connection;

use crate::error::Result;

/// Schema version - increment when making schema changes
const SCHEMA_VERSION: i32 = 1;

/// Run database migrations.
///
/// This is the single source of truth for the database schema; the HTTP
/// server and the monitoring daemon both call it at startup and whichever
/// runs first wins.
pub async fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL,
            description TEXT
        )",
        (),
    )
    .await?;

    let current_version = get_current_version(conn).await?;

    if current_version >= SCHEMA_VERSION {
        tracing::info!("Database schema is up to date (version {})", current_version);
        return Ok(());
    }

    tracing::info!("Running migrations from version {} to {}", current_version, SCHEMA_VERSION);

    if current_version < 1 {
        run_migration_v1(conn).await?;
        record_migration(conn, 1, "Targets and status check history").await?;
    }

    tracing::info!("Database migrations completed (now at version {})", SCHEMA_VERSION);
    Ok(())
}

/// Get current schema version from database
async fn get_current_version(conn: &Connection) -> Result<i32> {
    let mut rows = conn.query("SELECT MAX(version) FROM schema_migrations", ()).await?;

    if let Some(row) = rows.next().await? {
        let version: Option<i32> = row.get(0)?;
        Ok(version.unwrap_or(0))
    } else {
        Ok(0)
    }
}

/// Record that a migration was applied
async fn record_migration(conn: &Connection, version: i32, description: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO schema_migrations (version, applied_at, description) VALUES (?, ?, ?)",
        libsql::params![version, now, description],
    )
    .await?;
    Ok(())
}

async fn run_migration_v1(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS targets (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            url TEXT NOT NULL,
            interval_seconds INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            last_checked_at INTEGER,
            last_status TEXT NOT NULL DEFAULT 'unknown',
            last_latency_ms INTEGER,
            last_location TEXT
        )",
        (),
    )
    .await?;

    // History is append-only; deleting a target cascades to its records.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS status_checks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            target_id TEXT NOT NULL REFERENCES targets(id) ON DELETE CASCADE,
            created_at INTEGER NOT NULL,
            status TEXT NOT NULL,
            latency_ms INTEGER,
            location TEXT
        )",
        (),
    )
    .await?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_targets_owner ON targets(owner_id)",
        (),
    )
    .await?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_status_checks_target_time
            ON status_checks(target_id, created_at)",
        (),
    )
    .await?;

    Ok(())
}
