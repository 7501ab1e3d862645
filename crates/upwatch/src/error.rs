use thiserror::Error;
use uuid::Uuid;

/// Core error taxonomy.
///
/// Network failures during a probe are deliberately absent: a failed probe is
/// normal data (a Down outcome with no latency), carried in
/// [`crate::monitoring::types::ProbeOutcome`] and never propagated as an
/// error.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed caller input (URL, interval). Surfaced to the
    /// caller, never persisted as a check result.
    #[error("invalid input: {0}")]
    Input(String),

    /// A store read or write failed. Callers log it and abandon the current
    /// operation for that target; the orchestrator retries on the next tick.
    #[error("database error: {0}")]
    Persistence(#[from] libsql::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool::managed::PoolError<libsql::Error>),

    /// The referenced target was deleted concurrently. Treated as a no-op by
    /// every caller.
    #[error("target {0} no longer exists")]
    StaleTarget(Uuid),

    /// A stored row could not be decoded back into a model.
    #[error("stored row could not be decoded: {0}")]
    Corrupt(String),

    /// The outbound HTTP client could not be constructed.
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Error::Corrupt(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
