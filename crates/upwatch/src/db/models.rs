use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical status of a monitored target.
///
/// `Unknown` only ever appears as the live-state placeholder before a
/// target's first check; history records are always Up or Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Up,
    Down,
    Unknown,
}

impl TargetStatus {
    /// Stable lowercase form used in database rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetStatus::Up => "up",
            TargetStatus::Down => "down",
            TargetStatus::Unknown => "unknown",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "up" => TargetStatus::Up,
            "down" => TargetStatus::Down,
            _ => TargetStatus::Unknown,
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitored URL with its own check cadence.
///
/// The `last_*` fields are a cache of the most recent history record and are
/// written only by the reconciler; the record sequence stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredTarget {
    pub id: Uuid,
    pub owner_id: String,
    pub url: String,
    pub interval_seconds: u32,
    pub created_at: DateTime<Utc>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_status: TargetStatus,
    pub last_latency_ms: Option<u64>,
    pub last_location: Option<String>,
}

impl MonitoredTarget {
    /// Create a new target awaiting its first check.
    pub fn new(owner_id: String, url: String, interval_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            url,
            interval_seconds,
            created_at: Utc::now(),
            last_checked_at: None,
            last_status: TargetStatus::Unknown,
            last_latency_ms: None,
            last_location: None,
        }
    }
}

/// One immutable history record per completed check attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCheckRecord {
    /// Assigned by the store on insert, monotonically increasing.
    pub id: Option<i64>,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: TargetStatus,
    pub latency_ms: Option<u64>,
    pub location: Option<String>,
}

/// Convert a timestamp to the epoch-seconds form stored in the database.
pub fn to_epoch(time: DateTime<Utc>) -> i64 {
    time.timestamp()
}

/// Convert stored epoch seconds back to a timestamp.
pub fn from_epoch(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
