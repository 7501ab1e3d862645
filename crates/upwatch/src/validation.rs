use url::Url;

use crate::error::{Error, Result};

/// Tightest per-target check cadence the system supports.
pub const MIN_INTERVAL_SECONDS: u32 = 30;

/// Validate a target URL at creation time: non-empty, absolute, http or
/// https, with a host. The prober itself never re-validates shape.
pub fn validate_target_url(raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(Error::Input("url is required".into()));
    }

    let url = Url::parse(raw).map_err(|e| Error::Input(format!("invalid url: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(Error::Input(format!("unsupported url scheme: {other}"))),
    }

    if url.host_str().is_none() {
        return Err(Error::Input("url has no host".into()));
    }

    Ok(url)
}

/// Validate an owner-supplied check interval.
pub fn validate_interval(interval_seconds: u32) -> Result<()> {
    if interval_seconds < MIN_INTERVAL_SECONDS {
        return Err(Error::Input(format!(
            "interval must be at least {MIN_INTERVAL_SECONDS} seconds"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_target_url("http://example.com").is_ok());
        assert!(validate_target_url("https://example.com/path?q=1").is_ok());
    }

    #[test]
    fn rejects_empty_relative_and_other_schemes() {
        assert!(matches!(validate_target_url(""), Err(Error::Input(_))));
        assert!(matches!(validate_target_url("   "), Err(Error::Input(_))));
        assert!(matches!(validate_target_url("example.com"), Err(Error::Input(_))));
        assert!(matches!(validate_target_url("ftp://example.com"), Err(Error::Input(_))));
        assert!(matches!(validate_target_url("file:///etc/passwd"), Err(Error::Input(_))));
    }

    #[test]
    fn interval_floor_is_inclusive() {
        assert!(validate_interval(MIN_INTERVAL_SECONDS).is_ok());
        assert!(validate_interval(MIN_INTERVAL_SECONDS + 1).is_ok());
        assert!(matches!(validate_interval(29), Err(Error::Input(_))));
        assert!(matches!(validate_interval(0), Err(Error::Input(_))));
    }
}
