/// Status-check scheduling and evaluation core.
///
/// This module is responsible for:
/// - Probing target URLs for reachability and latency
/// - Deciding when each target's next check is due
/// - Driving the recurring check tick
/// - Reconciling raw probe outcomes into cached state + history
/// - Deriving rollup statistics for dashboards
pub mod aggregator;
pub mod evaluator;
pub mod orchestrator;
pub mod prober;
pub mod reconciler;
pub mod types;

pub use orchestrator::Orchestrator;
pub use prober::Prober;
pub use reconciler::Reconciler;
pub use types::ProbeOutcome;
