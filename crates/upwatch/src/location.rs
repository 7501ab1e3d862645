//! Best-effort label for the probing origin.
//!
//! Checks carry a human-readable description of where they were performed
//! from, resolved once from an IP geolocation service and cached. When no
//! metadata is available the literal `"Unknown Location"` is used.

use std::sync::{OnceLock, RwLock};
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::Deserialize;

pub const UNKNOWN_LOCATION: &str = "Unknown Location";

static LOCATION_CACHE: OnceLock<RwLock<LocationCache>> = OnceLock::new();

struct LocationCache {
    location: Location,
    last_attempt: Option<Instant>,
    refresh_interval: Duration,
}

/// Response from ip-api.com geolocation service
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    city: String,
    #[serde(rename = "regionName", default)]
    region: String,
    #[serde(rename = "countryCode", default)]
    country_code: String,
}

/// Geographic description of the probing origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl Location {
    /// Format as a display label, e.g. "Amsterdam, North Holland, NL".
    pub fn label(&self) -> String {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() { UNKNOWN_LOCATION.to_string() } else { parts.join(", ") }
    }
}

fn cache() -> &'static RwLock<LocationCache> {
    LOCATION_CACHE.get_or_init(|| {
        RwLock::new(LocationCache {
            location: Location::default(),
            last_attempt: None,
            refresh_interval: Duration::from_secs(3600),
        })
    })
}

/// Fetch location from IP geolocation API
async fn fetch_location_from_ip() -> Result<Location> {
    // ip-api.com is free and needs no API key (45 requests/minute).
    let response =
        reqwest::get("http://ip-api.com/json/?fields=status,city,regionName,countryCode")
            .await?
            .json::<IpApiResponse>()
            .await?;

    if response.status != "success" {
        return Ok(Location::default());
    }

    let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
    Ok(Location {
        city: non_empty(response.city),
        region: non_empty(response.region),
        country: non_empty(response.country_code),
    })
}

/// Configure how often the cached label is refreshed.
pub fn set_refresh_interval(interval: Duration) {
    if let Ok(mut guard) = cache().write() {
        guard.refresh_interval = interval;
    }
}

/// Current label for the probing origin, `"Unknown Location"` until a
/// refresh has succeeded.
pub fn current_label() -> String {
    match cache().read() {
        Ok(guard) => guard.location.label(),
        Err(_) => UNKNOWN_LOCATION.to_string(),
    }
}

/// Refresh the cached location in the background (non-blocking).
pub fn refresh() {
    if let Ok(mut guard) = cache().write() {
        guard.last_attempt = Some(Instant::now());
    }

    tokio::spawn(async move {
        match fetch_location_from_ip().await {
            Ok(location) => {
                if let Ok(mut guard) = cache().write() {
                    guard.location = location;
                    tracing::info!("Probe origin location updated: {}", guard.location.label());
                }
            }
            Err(e) => {
                tracing::warn!("Failed to resolve probe origin location: {}", e);
            }
        }
    });
}

/// Refresh when the cached label has gone stale. Called from the
/// orchestrator tick; cheap when nothing is due.
pub fn refresh_if_stale() {
    let due = match cache().read() {
        Ok(guard) => match guard.last_attempt {
            None => true,
            Some(at) => at.elapsed() >= guard.refresh_interval,
        },
        Err(_) => false,
    };

    if due {
        refresh();
    }
}
