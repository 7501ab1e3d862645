use std::time::{Duration, Instant};

use super::types::ProbeOutcome;
use crate::error::Result;

/// User-agent sent with every probe so operators can tell monitoring traffic
/// apart in their own logs.
const PROBE_USER_AGENT: &str = concat!("upwatch-probe/", env!("CARGO_PKG_VERSION"));

/// Performs single reachability checks against target URLs.
///
/// Holds no persistent state; its only side effect is the outbound request.
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    /// Build a prober. `timeout_seconds` of None leaves the network stack's
    /// own limits in place, which is the default policy; redirects are
    /// followed either way.
    pub fn new(timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(PROBE_USER_AGENT);

        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self { client: builder.build()? })
    }

    /// Perform exactly one GET against `url` and report the raw outcome.
    ///
    /// Never returns an error: network/DNS/TLS failures and malformed input
    /// all come back as an unreachable outcome. Latency covers the full
    /// round trip through body receipt, not just time to first byte.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let started = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::unreachable(e.to_string()),
        };

        let http_status = response.status().as_u16();

        // Drain the body so the measurement includes it. A mid-stream error
        // still counts as reachable: a response was received.
        let _ = response.bytes().await;

        let latency_ms = started.elapsed().as_millis() as u64;
        ProbeOutcome::response(latency_ms, http_status)
    }
}
