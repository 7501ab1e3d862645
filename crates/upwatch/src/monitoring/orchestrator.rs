use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::evaluator;
use super::prober::Prober;
use super::reconciler::Reconciler;
use crate::config::Config;
use crate::db::models::MonitoredTarget;
use crate::db::{self, LibsqlStore, Store};
use crate::error::{Error, Result};
use crate::location;
use crate::pool::LibsqlPool;

/// Drives the check cadence for all monitored targets.
///
/// The orchestrator holds no durable state: every tick re-reads the target
/// list from the store, so the store stays the single source of truth. The
/// in-flight set guarantees at most one running check per target even when
/// a probe outlasts several ticks.
pub struct Orchestrator {
    store: Arc<dyn Store>,
    prober: Arc<Prober>,
    reconciler: Reconciler,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    tick: Duration,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn Store>, prober: Arc<Prober>, tick_seconds: u64) -> Self {
        Self {
            reconciler: Reconciler::new(store.clone()),
            store,
            prober,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            tick: Duration::from_secs(tick_seconds.max(1)),
        }
    }

    /// Create and run an orchestrator over a fresh pool.
    /// This is a convenience method for the service binary.
    pub async fn start(config: &Config, pool: LibsqlPool) -> Result<()> {
        let conn = pool.get().await?;
        info!("Initializing database schema...");
        db::initialize(&conn).await?;
        drop(conn);

        let store: Arc<dyn Store> = Arc::new(LibsqlStore::new(pool));
        let prober = Arc::new(Prober::new(config.monitor.timeout_seconds)?);

        location::set_refresh_interval(Duration::from_secs(
            config.monitor.location_refresh_seconds.max(60),
        ));
        location::refresh();

        let orchestrator = Self::new(store, prober, config.monitor.tick_seconds);
        orchestrator.repair_all().await;
        orchestrator.run().await
    }

    /// Recompute every target's cached fields from its history. Run once at
    /// startup so an interrupted previous run cannot leave the cache lagging.
    pub async fn repair_all(&self) {
        let targets = match self.store.all_targets().await {
            Ok(targets) => targets,
            Err(e) => {
                warn!("Skipping startup cache repair, store unavailable: {}", e);
                return;
            }
        };

        for target in targets {
            match self.reconciler.repair(target.id).await {
                Ok(()) => {}
                Err(Error::StaleTarget(_)) => {}
                Err(e) => warn!(target_id = %target.id, "cache repair failed: {}", e),
            }
        }
    }

    /// Run the recurring tick loop forever.
    pub async fn run(&self) -> Result<()> {
        info!(tick_seconds = self.tick.as_secs(), "Orchestrator started - scheduling checks");

        let mut timer = tokio::time::interval(self.tick);
        loop {
            timer.tick().await;
            location::refresh_if_stale();
            self.run_tick(Utc::now()).await;
        }
    }

    /// One scheduling pass: load targets, filter due ones, dispatch checks.
    ///
    /// Returns the handles of the dispatched checks; the loop lets them run
    /// detached, tests await them. A store read failure abandons the whole
    /// tick (every target is retried on the next one); a single target's
    /// check failure never affects its siblings.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Vec<JoinHandle<()>> {
        let targets = match self.store.all_targets().await {
            Ok(targets) => targets,
            Err(e) => {
                error!("Failed to load targets, skipping tick: {}", e);
                return Vec::new();
            }
        };

        let mut handles = Vec::new();
        for target in targets {
            if !evaluator::is_due(target.last_checked_at, target.interval_seconds, now) {
                continue;
            }

            {
                let mut in_flight = self.in_flight.lock().await;
                if !in_flight.insert(target.id) {
                    // Previous check still running; re-dispatching would
                    // break the one-in-flight-per-target invariant.
                    debug!(target_id = %target.id, "check already in flight, skipping");
                    continue;
                }
            }

            handles.push(self.dispatch(target));
        }

        handles
    }

    fn dispatch(&self, target: MonitoredTarget) -> JoinHandle<()> {
        let prober = self.prober.clone();
        let reconciler = self.reconciler.clone();
        let in_flight = self.in_flight.clone();

        tokio::spawn(async move {
            match check_target(&prober, &reconciler, &target).await {
                Ok(()) => {}
                Err(Error::StaleTarget(id)) => {
                    debug!(target_id = %id, "target deleted mid-check, dropping result");
                }
                Err(e) => {
                    error!(target_id = %target.id, url = %target.url, "check failed: {}", e);
                }
            }

            in_flight.lock().await.remove(&target.id);
        })
    }
}

/// Probe a target once and reconcile the outcome.
///
/// Shared by the tick loop and by the creation path, which gives a freshly
/// added target one immediate check outside the regular cadence.
pub async fn check_target(
    prober: &Prober,
    reconciler: &Reconciler,
    target: &MonitoredTarget,
) -> Result<()> {
    let outcome = prober.probe(&target.url).await;
    let origin = location::current_label();
    reconciler.reconcile(target.id, &outcome, Some(origin)).await
}
