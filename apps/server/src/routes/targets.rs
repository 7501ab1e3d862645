use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{Duration, Utc};
use serde::Deserialize;
use upwatch::db::models::MonitoredTarget;
use upwatch::monitoring::{Reconciler, aggregator, orchestrator};
use upwatch::validation;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

fn default_interval() -> u32 {
    60
}

fn default_window_days() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTargetRequest {
    #[serde(default)]
    owner_id: String,
    #[serde(default)]
    url: String,
    #[serde(default = "default_interval")]
    interval_seconds: u32,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    owner: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTargetRequest {
    interval_seconds: u32,
}

#[derive(Debug, Deserialize)]
struct WindowQuery {
    #[serde(default = "default_window_days")]
    days: u32,
}

#[post("/api/targets")]
pub async fn create_target(
    state: web::Data<AppState>,
    body: web::Json<CreateTargetRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.owner_id.trim().is_empty() {
        return Err(ApiError::BadRequest("ownerId is required".into()));
    }
    validation::validate_target_url(&body.url)?;
    validation::validate_interval(body.interval_seconds)?;

    let target = MonitoredTarget::new(body.owner_id, body.url, body.interval_seconds);
    state.store.create_target(&target).await?;

    // The first check runs now instead of waiting out the interval, so the
    // caller sees real state on the next read.
    let prober = state.prober.clone();
    let reconciler = Reconciler::new(state.store.clone());
    let fresh = target.clone();
    tokio::spawn(async move {
        if let Err(e) = orchestrator::check_target(&prober, &reconciler, &fresh).await {
            tracing::debug!(target_id = %fresh.id, "initial check did not complete: {e}");
        }
    });

    Ok(HttpResponse::Created().json(target))
}

#[get("/api/targets")]
pub async fn list_targets(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let targets = match query.owner.as_deref() {
        Some(owner) => state.store.targets_for_owner(owner).await?,
        None => state.store.all_targets().await?,
    };

    Ok(HttpResponse::Ok().json(targets))
}

#[get("/api/targets/{id}")]
pub async fn get_target(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let target = state.store.target(*id).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(target))
}

/// Only the interval is mutable; changing the URL means a different target
/// with its own history.
#[patch("/api/targets/{id}")]
pub async fn update_target(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<UpdateTargetRequest>,
) -> Result<HttpResponse, ApiError> {
    validation::validate_interval(body.interval_seconds)?;

    if !state.store.set_interval(*id, body.interval_seconds).await? {
        return Err(ApiError::NotFound);
    }

    let target = state.store.target(*id).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(target))
}

#[delete("/api/targets/{id}")]
pub async fn delete_target(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    if !state.store.delete_target(*id).await? {
        return Err(ApiError::NotFound);
    }

    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/targets/{id}/summary")]
pub async fn target_summary(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    query: web::Query<WindowQuery>,
) -> Result<HttpResponse, ApiError> {
    if state.store.target(*id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let days = query.days.clamp(1, 365);
    let now = Utc::now();
    let records = state.store.records_since(*id, now - Duration::days(i64::from(days))).await?;
    let summary = aggregator::summarize(&records, days, now.date_naive());

    Ok(HttpResponse::Ok().json(summary))
}

#[get("/api/targets/{id}/history")]
pub async fn target_history(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    query: web::Query<WindowQuery>,
) -> Result<HttpResponse, ApiError> {
    if state.store.target(*id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let days = query.days.clamp(1, 365);
    let since = Utc::now() - Duration::days(i64::from(days));
    let records = state.store.records_since(*id, since).await?;

    Ok(HttpResponse::Ok().json(records))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use upwatch::db::{self, LibsqlStore, Store};
    use upwatch::pool::{LibsqlManager, LibsqlPool};

    use super::*;
    use crate::routes;
    use crate::state::AppState;

    async fn test_state() -> (TempDir, Arc<dyn Store>, web::Data<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        let database =
            libsql::Builder::new_local(dir.path().join("test.db")).build().await.unwrap();
        let pool: LibsqlPool =
            deadpool::managed::Pool::builder(LibsqlManager::new(database)).build().unwrap();

        let conn = pool.get().await.unwrap();
        db::initialize(&conn).await.unwrap();
        drop(conn);

        let store: Arc<dyn Store> = Arc::new(LibsqlStore::new(pool));
        let state = web::Data::new(AppState::new(store.clone(), Some(5)).unwrap());
        (dir, store, state)
    }

    #[actix_web::test]
    async fn create_rejects_invalid_input() {
        let (_dir, _store, state) = test_state().await;
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::routes),
        )
        .await;

        for body in [
            json!({ "ownerId": "alice", "url": "" }),
            json!({ "ownerId": "alice", "url": "not-a-url" }),
            json!({ "ownerId": "alice", "url": "ftp://example.com" }),
            json!({ "ownerId": "", "url": "https://example.com" }),
            json!({ "ownerId": "alice", "url": "https://example.com", "intervalSeconds": 5 }),
        ] {
            let req = test::TestRequest::post().uri("/api/targets").set_json(&body).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");

            let error: Value = test::read_body_json(res).await;
            assert!(error["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn create_then_fetch_roundtrip() {
        let (_dir, _store, state) = test_state().await;
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/targets")
            .set_json(json!({ "ownerId": "alice", "url": "http://127.0.0.1:9/" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let created: Value = test::read_body_json(res).await;
        assert_eq!(created["intervalSeconds"], 60);
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get().uri(&format!("/api/targets/{id}")).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let fetched: Value = test::read_body_json(res).await;
        assert_eq!(fetched["url"], "http://127.0.0.1:9/");
        assert_eq!(fetched["ownerId"], "alice");
    }

    #[actix_web::test]
    async fn list_filters_by_owner() {
        let (_dir, store, state) = test_state().await;
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::routes),
        )
        .await;

        store
            .create_target(&MonitoredTarget::new("alice".into(), "https://a.example".into(), 60))
            .await
            .unwrap();
        store
            .create_target(&MonitoredTarget::new("bob".into(), "https://b.example".into(), 60))
            .await
            .unwrap();

        let req = test::TestRequest::get().uri("/api/targets?owner=alice").to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["ownerId"], "alice");

        let req = test::TestRequest::get().uri("/api/targets").to_request();
        let all: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn patch_changes_interval_and_rejects_floor_violations() {
        let (_dir, store, state) = test_state().await;
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::routes),
        )
        .await;

        let target = MonitoredTarget::new("alice".into(), "https://example.com".into(), 60);
        store.create_target(&target).await.unwrap();

        let req = test::TestRequest::patch()
            .uri(&format!("/api/targets/{}", target.id))
            .set_json(json!({ "intervalSeconds": 120 }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["intervalSeconds"], 120);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/targets/{}", target.id))
            .set_json(json!({ "intervalSeconds": 1 }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delete_removes_target_and_later_reads_404() {
        let (_dir, store, state) = test_state().await;
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::routes),
        )
        .await;

        let target = MonitoredTarget::new("alice".into(), "https://example.com".into(), 60);
        store.create_target(&target).await.unwrap();

        let req =
            test::TestRequest::delete().uri(&format!("/api/targets/{}", target.id)).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        for uri in [
            format!("/api/targets/{}", target.id),
            format!("/api/targets/{}/summary", target.id),
            format!("/api/targets/{}/history", target.id),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "uri: {uri}");
        }
    }

    #[actix_web::test]
    async fn summary_of_unchecked_target_is_optimistic() {
        let (_dir, store, state) = test_state().await;
        let app = test::init_service(
            App::new().app_data(state.clone()).configure(routes::routes),
        )
        .await;

        let target = MonitoredTarget::new("alice".into(), "https://example.com".into(), 60);
        store.create_target(&target).await.unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/targets/{}/summary?days=7", target.id))
            .to_request();
        let summary: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(summary["uptimePercent"], 100.0);
        assert_eq!(summary["avgLatencyMs"], 0.0);
        assert_eq!(summary["dailyStatuses"].as_array().unwrap().len(), 7);
    }
}
