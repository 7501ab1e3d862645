use chrono::{DateTime, Utc};

/// Decide whether a target's next check is due at `now`.
///
/// Pure: a target is due when the time since its last completed check meets
/// or exceeds its interval. A target that has never been checked is always
/// due. `last_checked_at` is stamped at reconciliation time, so a slow
/// in-flight probe does not make its target look due again by itself.
pub fn is_due(
    last_checked_at: Option<DateTime<Utc>>,
    interval_seconds: u32,
    now: DateTime<Utc>,
) -> bool {
    match last_checked_at {
        None => true,
        Some(last) => (now - last).num_seconds() >= i64::from(interval_seconds),
    }
}
