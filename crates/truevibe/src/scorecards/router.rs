use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Attribute, CampaignId, ComponentInput, EditorId, PairingId};
use super::repository::{RepositoryError, ScorecardRepository};
use super::service::{ScorecardService, ScorecardServiceError};
use super::suggest::{suggest, QuantitativeMetrics};

const SCORECARD_PATH: &str = "/api/v1/campaigns/:campaign_id/influencers/:influencer_id/scorecard";

/// Body of a component edit.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentEditRequest {
    pub editor_id: String,
    pub expected_version: u64,
    pub input: ComponentInput,
}

/// Body of an explicit clear.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearComponentRequest {
    pub editor_id: String,
    pub expected_version: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotesRequest {
    pub editor_id: String,
    pub expected_version: u64,
    #[serde(default)]
    pub notes: String,
}

/// Router builder exposing the scorecard read and write APIs.
pub fn scorecard_router<R>(service: Arc<ScorecardService<R>>) -> Router
where
    R: ScorecardRepository + 'static,
{
    Router::new()
        .route(
            SCORECARD_PATH,
            get(scorecard_handler::<R>).post(open_handler::<R>),
        )
        .route(
            &format!("{SCORECARD_PATH}/components/:attribute"),
            put(component_edit_handler::<R>),
        )
        .route(
            &format!("{SCORECARD_PATH}/components/:attribute/clear"),
            post(clear_component_handler::<R>),
        )
        .route(&format!("{SCORECARD_PATH}/notes"), put(notes_handler::<R>))
        .route(
            "/api/v1/campaigns/:campaign_id/scorecards",
            get(campaign_export_handler::<R>),
        )
        .route(
            "/api/v1/campaigns/:campaign_id/summary",
            get(campaign_summary_handler::<R>),
        )
        .route("/api/v1/suggestions", post(suggestions_handler))
        .with_state(service)
}

pub(crate) async fn open_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path((campaign_id, influencer_id)): Path<(u64, u64)>,
) -> Response
where
    R: ScorecardRepository + 'static,
{
    match service.open(PairingId::new(campaign_id, influencer_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn scorecard_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path((campaign_id, influencer_id)): Path<(u64, u64)>,
) -> Response
where
    R: ScorecardRepository + 'static,
{
    match service.get(&PairingId::new(campaign_id, influencer_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn component_edit_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path((campaign_id, influencer_id, attribute)): Path<(u64, u64, Attribute)>,
    Json(request): Json<ComponentEditRequest>,
) -> Response
where
    R: ScorecardRepository + 'static,
{
    let result = service.apply_component_edit(
        PairingId::new(campaign_id, influencer_id),
        attribute,
        EditorId(request.editor_id),
        request.input,
        request.expected_version,
    );
    match result {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn clear_component_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path((campaign_id, influencer_id, attribute)): Path<(u64, u64, Attribute)>,
    Json(request): Json<ClearComponentRequest>,
) -> Response
where
    R: ScorecardRepository + 'static,
{
    let result = service.clear_component(
        PairingId::new(campaign_id, influencer_id),
        attribute,
        EditorId(request.editor_id),
        request.expected_version,
    );
    match result {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn notes_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path((campaign_id, influencer_id)): Path<(u64, u64)>,
    Json(request): Json<NotesRequest>,
) -> Response
where
    R: ScorecardRepository + 'static,
{
    let result = service.update_notes(
        PairingId::new(campaign_id, influencer_id),
        EditorId(request.editor_id),
        &request.notes,
        request.expected_version,
    );
    match result {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn campaign_export_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path(campaign_id): Path<u64>,
) -> Response
where
    R: ScorecardRepository + 'static,
{
    match service.campaign_export(CampaignId(campaign_id)) {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn campaign_summary_handler<R>(
    State(service): State<Arc<ScorecardService<R>>>,
    Path(campaign_id): Path<u64>,
) -> Response
where
    R: ScorecardRepository + 'static,
{
    match service.campaign_summary(CampaignId(campaign_id)) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn suggestions_handler(Json(metrics): Json<QuantitativeMetrics>) -> Response {
    (StatusCode::OK, Json(suggest(&metrics))).into_response()
}

impl ScorecardServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScorecardServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScorecardServiceError::Conflict { .. }
            | ScorecardServiceError::Repository(RepositoryError::VersionMismatch { .. }) => {
                StatusCode::CONFLICT
            }
            ScorecardServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ScorecardServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ScorecardServiceError::Traceability { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScorecardServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let payload = match &self {
            ScorecardServiceError::Conflict {
                attribute,
                expected,
                actual,
                ..
            } => json!({
                "error": self.to_string(),
                "attribute": attribute.map(Attribute::key),
                "expected_version": expected,
                "actual_version": actual,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(payload)).into_response()
    }
}
