/// Upwatch core library.
///
/// Users register URLs as monitored targets; the orchestrator periodically
/// probes each target's reachability and latency, reconciles results into a
/// persistent store, and the aggregator derives rollup statistics for
/// dashboards.
pub mod config;
pub mod db;
pub mod error;
pub mod location;
pub mod monitoring;
pub mod pool;
pub mod validation;

pub use config::Config;
pub use error::Error;

#[cfg(test)]
pub(crate) mod testutil;
