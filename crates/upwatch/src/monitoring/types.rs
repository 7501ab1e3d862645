use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw outcome of a single probe attempt.
///
/// The prober reports what it observed and nothing more; mapping to logical
/// Up/Down happens in the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Whether any HTTP response was received, regardless of status code.
    pub reachable: bool,

    /// HTTP status code, when a response was received.
    pub http_status: Option<u16>,

    /// Round-trip time in milliseconds, request start through complete body
    /// receipt. Absent when no response was measurable.
    pub latency_ms: Option<u64>,

    /// Failure description when the probe could not complete.
    pub error_message: Option<String>,
}

impl ProbeOutcome {
    /// A response was received.
    pub fn response(latency_ms: u64, http_status: u16) -> Self {
        Self {
            reachable: true,
            http_status: Some(http_status),
            latency_ms: Some(latency_ms),
            error_message: None,
        }
    }

    /// The probe failed before any response was measurable.
    pub fn unreachable(error: impl Into<String>) -> Self {
        Self {
            reachable: false,
            http_status: None,
            latency_ms: None,
            error_message: Some(error.into()),
        }
    }
}

/// Classification of one calendar day in a target's status grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DailyStatus {
    Up,
    Down,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub status: DailyStatus,
}

/// Rollup statistics over a trailing window of history records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub uptime_percent: f64,
    pub avg_latency_ms: f64,
    pub daily_statuses: Vec<DaySummary>,
}
