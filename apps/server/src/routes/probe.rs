use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use upwatch::db::models::TargetStatus;
use upwatch::location;
use upwatch::monitoring::reconciler;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CheckStatusRequest {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckStatusResponse {
    /// "Up" or "Down".
    status: &'static str,
    /// Null when no response was measurable.
    latency: Option<u64>,
    /// Present only when the host answered with a non-success code, so the
    /// caller can tell an HTTP-level failure from an unreachable host.
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    monitoring_location: String,
}

/// One-off check of an arbitrary URL, without registering it as a target.
/// Nothing is persisted.
#[post("/api/check-status")]
pub async fn check_status(
    state: web::Data<AppState>,
    body: web::Json<CheckStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url is required".into()));
    }

    let outcome = state.prober.probe(&body.url).await;
    let status = reconciler::classify(&outcome);

    let status_code = match status {
        TargetStatus::Down => outcome.http_status,
        _ => None,
    };

    Ok(HttpResponse::Ok().json(CheckStatusResponse {
        status: if status == TargetStatus::Up { "Up" } else { "Down" },
        latency: if outcome.reachable { outcome.latency_ms } else { None },
        status_code,
        monitoring_location: location::current_label(),
    }))
}
