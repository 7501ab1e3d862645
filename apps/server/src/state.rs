use std::sync::Arc;

use upwatch::db::Store;
use upwatch::error::Result;
use upwatch::monitoring::Prober;

/// State shared by every worker: the store handle and the prober used by the
/// one-off check endpoint and by the immediate first check on creation.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub prober: Arc<Prober>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, probe_timeout_seconds: Option<u64>) -> Result<Self> {
        Ok(Self { store, prober: Arc::new(Prober::new(probe_timeout_seconds)?) })
    }
}
