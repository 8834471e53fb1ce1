use crate::infra::{export_csv, AppState};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use truevibe::error::AppError;
use truevibe::scorecards::{scorecard_router, CampaignId, ScorecardRepository, ScorecardService};

pub(crate) fn with_scorecard_routes<R>(service: Arc<ScorecardService<R>>) -> Router
where
    R: ScorecardRepository + 'static,
{
    let exports = Router::new()
        .route(
            "/api/v1/campaigns/:campaign_id/export.csv",
            get(export_csv_endpoint::<R>),
        )
        .with_state(service.clone());

    scorecard_router(service)
        .merge(exports)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn export_csv_endpoint<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path(campaign_id): Path<u64>,
) -> Result<Response, AppError>
where
    R: ScorecardRepository + 'static,
{
    let rows = service.campaign_export(CampaignId(campaign_id))?;
    let body = export_csv(&rows)?;
    let disposition = format!("attachment; filename=\"campaign-{campaign_id}-scorecards.csv\"");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
