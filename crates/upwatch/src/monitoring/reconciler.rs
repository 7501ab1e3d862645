use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::types::ProbeOutcome;
use crate::db::Store;
use crate::db::models::{StatusCheckRecord, TargetStatus};
use crate::error::{Error, Result};

/// Map a raw probe outcome to logical status: Up iff a response was received
/// with a 2xx/3xx code; anything else, including connection failure, is Down.
pub fn classify(outcome: &ProbeOutcome) -> TargetStatus {
    match outcome.http_status {
        Some(code) if outcome.reachable && (200..400).contains(&code) => TargetStatus::Up,
        _ => TargetStatus::Down,
    }
}

/// Turns raw probe outcomes into persisted state.
///
/// Each completed check produces two writes: one appended history record and
/// one update of the target's cached latest fields. They are not a single
/// transaction; the history side is authoritative and [`Reconciler::repair`]
/// re-derives the cache from it, so a partially completed pair is a
/// transient, self-healing condition.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn Store>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Persist one completed check attempt.
    ///
    /// `last_checked_at` is stamped here, after the probe has completed, not
    /// at dispatch time. Reconciling against a deleted target returns
    /// [`Error::StaleTarget`], which callers treat as a no-op.
    pub async fn reconcile(
        &self,
        target_id: Uuid,
        outcome: &ProbeOutcome,
        location: Option<String>,
    ) -> Result<()> {
        let status = classify(outcome);
        let latency_ms = if outcome.reachable { outcome.latency_ms } else { None };
        let checked_at = Utc::now();

        if self.store.target(target_id).await?.is_none() {
            return Err(Error::StaleTarget(target_id));
        }

        let record = StatusCheckRecord {
            id: None,
            target_id,
            created_at: checked_at,
            status,
            latency_ms,
            location: location.clone(),
        };

        // History first: it is the authoritative side of the pair. The
        // target can still vanish between the existence check and the
        // append; the resulting foreign key failure is the stale case.
        if let Err(e) = self.store.append_record(&record).await {
            if self.store.target(target_id).await?.is_none() {
                return Err(Error::StaleTarget(target_id));
            }
            return Err(e);
        }

        let updated = self
            .store
            .update_check_state(target_id, status, latency_ms, location.as_deref(), checked_at)
            .await?;
        if !updated {
            // Deleted between the two writes; the appended record cascaded
            // away with the target.
            return Err(Error::StaleTarget(target_id));
        }

        debug!(
            target_id = %target_id,
            status = %status,
            latency_ms = ?latency_ms,
            "check reconciled"
        );
        Ok(())
    }

    /// Recompute a target's cached fields from its latest history record.
    ///
    /// The cache is a materialized view; this makes "cache lags history"
    /// recoverable at any time. A target with no history keeps its initial
    /// Unknown placeholder.
    pub async fn repair(&self, target_id: Uuid) -> Result<()> {
        let Some(target) = self.store.target(target_id).await? else {
            return Err(Error::StaleTarget(target_id));
        };

        let Some(latest) = self.store.latest_record(target_id).await? else {
            return Ok(());
        };

        let cache_matches = target.last_checked_at.map(|t| t.timestamp())
            == Some(latest.created_at.timestamp())
            && target.last_status == latest.status
            && target.last_latency_ms == latest.latency_ms
            && target.last_location == latest.location;

        if !cache_matches {
            debug!(target_id = %target_id, "cached state lagged history, repairing");
            self.store
                .update_check_state(
                    target_id,
                    latest.status,
                    latest.latency_ms,
                    latest.location.as_deref(),
                    latest.created_at,
                )
                .await?;
        }

        Ok(())
    }
}
