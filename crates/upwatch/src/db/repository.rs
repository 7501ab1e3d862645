use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Row, params};
use uuid::Uuid;

use super::models::{MonitoredTarget, StatusCheckRecord, TargetStatus, from_epoch, to_epoch};
use crate::error::Result;
use crate::pool::{LibsqlManager, LibsqlPool};

/// Store trait for abstracting persistence operations
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new monitored target.
    async fn create_target(&self, target: &MonitoredTarget) -> Result<()>;

    /// All targets, regardless of owner. Read by the orchestrator each tick.
    async fn all_targets(&self) -> Result<Vec<MonitoredTarget>>;

    /// Targets belonging to one owner.
    async fn targets_for_owner(&self, owner_id: &str) -> Result<Vec<MonitoredTarget>>;

    /// Single target lookup.
    async fn target(&self, id: Uuid) -> Result<Option<MonitoredTarget>>;

    /// Change a target's check interval. Returns false when the target no
    /// longer exists.
    async fn set_interval(&self, id: Uuid, interval_seconds: u32) -> Result<bool>;

    /// Update the cached latest-check fields. Returns false when the target
    /// no longer exists.
    async fn update_check_state(
        &self,
        id: Uuid,
        status: TargetStatus,
        latency_ms: Option<u64>,
        location: Option<&str>,
        checked_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Delete a target; its history records cascade away with it. Returns
    /// false when the target no longer exists.
    async fn delete_target(&self, id: Uuid) -> Result<bool>;

    /// Append one immutable history record, returning its assigned id.
    async fn append_record(&self, record: &StatusCheckRecord) -> Result<i64>;

    /// History records for a target from `since` onward, oldest first.
    async fn records_since(
        &self,
        target_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<StatusCheckRecord>>;

    /// The most recent history record for a target, if any.
    async fn latest_record(&self, target_id: Uuid) -> Result<Option<StatusCheckRecord>>;
}

/// libsql-backed store implementation
pub struct LibsqlStore {
    pool: LibsqlPool,
}

impl LibsqlStore {
    pub fn new(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    async fn get_conn(&self) -> Result<deadpool::managed::Object<LibsqlManager>> {
        Ok(self.pool.get().await?)
    }
}

const TARGET_COLUMNS: &str = "id, owner_id, url, interval_seconds, created_at, \
     last_checked_at, last_status, last_latency_ms, last_location";

const RECORD_COLUMNS: &str = "id, target_id, created_at, status, latency_ms, location";

fn decode_target(row: &Row) -> Result<MonitoredTarget> {
    let id: String = row.get(0)?;
    let status: String = row.get(6)?;
    Ok(MonitoredTarget {
        id: Uuid::parse_str(&id)?,
        owner_id: row.get(1)?,
        url: row.get(2)?,
        interval_seconds: row.get::<i64>(3)? as u32,
        created_at: from_epoch(row.get(4)?),
        last_checked_at: row.get::<Option<i64>>(5)?.map(from_epoch),
        last_status: TargetStatus::from_db(&status),
        last_latency_ms: row.get::<Option<i64>>(7)?.map(|v| v as u64),
        last_location: row.get(8)?,
    })
}

fn decode_record(row: &Row) -> Result<StatusCheckRecord> {
    let target_id: String = row.get(1)?;
    let status: String = row.get(3)?;
    Ok(StatusCheckRecord {
        id: Some(row.get(0)?),
        target_id: Uuid::parse_str(&target_id)?,
        created_at: from_epoch(row.get(2)?),
        status: TargetStatus::from_db(&status),
        latency_ms: row.get::<Option<i64>>(4)?.map(|v| v as u64),
        location: row.get(5)?,
    })
}

#[async_trait]
impl Store for LibsqlStore {
    async fn create_target(&self, target: &MonitoredTarget) -> Result<()> {
        let conn = self.get_conn().await?;
        conn.execute(
            "INSERT INTO targets (id, owner_id, url, interval_seconds, created_at, \
             last_checked_at, last_status, last_latency_ms, last_location) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                target.id.to_string(),
                target.owner_id.clone(),
                target.url.clone(),
                target.interval_seconds as i64,
                to_epoch(target.created_at),
                target.last_checked_at.map(to_epoch),
                target.last_status.as_str(),
                target.last_latency_ms.map(|v| v as i64),
                target.last_location.clone()
            ],
        )
        .await?;
        Ok(())
    }

    async fn all_targets(&self) -> Result<Vec<MonitoredTarget>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(&format!("SELECT {TARGET_COLUMNS} FROM targets ORDER BY created_at"), ())
            .await?;

        let mut targets = Vec::new();
        while let Some(row) = rows.next().await? {
            targets.push(decode_target(&row)?);
        }
        Ok(targets)
    }

    async fn targets_for_owner(&self, owner_id: &str) -> Result<Vec<MonitoredTarget>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {TARGET_COLUMNS} FROM targets WHERE owner_id = ? ORDER BY created_at"
                ),
                params![owner_id],
            )
            .await?;

        let mut targets = Vec::new();
        while let Some(row) = rows.next().await? {
            targets.push(decode_target(&row)?);
        }
        Ok(targets)
    }

    async fn target(&self, id: Uuid) -> Result<Option<MonitoredTarget>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {TARGET_COLUMNS} FROM targets WHERE id = ?"),
                params![id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(decode_target(&row)?)),
            None => Ok(None),
        }
    }

    async fn set_interval(&self, id: Uuid, interval_seconds: u32) -> Result<bool> {
        let conn = self.get_conn().await?;
        let changed = conn
            .execute(
                "UPDATE targets SET interval_seconds = ? WHERE id = ?",
                params![interval_seconds as i64, id.to_string()],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn update_check_state(
        &self,
        id: Uuid,
        status: TargetStatus,
        latency_ms: Option<u64>,
        location: Option<&str>,
        checked_at: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.get_conn().await?;
        let changed = conn
            .execute(
                "UPDATE targets SET last_status = ?, last_latency_ms = ?, \
                 last_location = ?, last_checked_at = ? WHERE id = ?",
                params![
                    status.as_str(),
                    latency_ms.map(|v| v as i64),
                    location,
                    to_epoch(checked_at),
                    id.to_string()
                ],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn delete_target(&self, id: Uuid) -> Result<bool> {
        let conn = self.get_conn().await?;
        // Related status_checks rows are removed via ON DELETE CASCADE.
        let changed = conn
            .execute("DELETE FROM targets WHERE id = ?", params![id.to_string()])
            .await?;
        Ok(changed > 0)
    }

    async fn append_record(&self, record: &StatusCheckRecord) -> Result<i64> {
        let conn = self.get_conn().await?;
        conn.execute(
            "INSERT INTO status_checks (target_id, created_at, status, latency_ms, location) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                record.target_id.to_string(),
                to_epoch(record.created_at),
                record.status.as_str(),
                record.latency_ms.map(|v| v as i64),
                record.location.clone()
            ],
        )
        .await?;

        Ok(conn.last_insert_rowid())
    }

    async fn records_since(
        &self,
        target_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<StatusCheckRecord>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM status_checks \
                     WHERE target_id = ? AND created_at >= ? \
                     ORDER BY created_at ASC, id ASC"
                ),
                params![target_id.to_string(), to_epoch(since)],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(decode_record(&row)?);
        }
        Ok(records)
    }

    async fn latest_record(&self, target_id: Uuid) -> Result<Option<StatusCheckRecord>> {
        let conn = self.get_conn().await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {RECORD_COLUMNS} FROM status_checks \
                     WHERE target_id = ? ORDER BY created_at DESC, id DESC LIMIT 1"
                ),
                params![target_id.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(decode_record(&row)?)),
            None => Ok(None),
        }
    }
}
