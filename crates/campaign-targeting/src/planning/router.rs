use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::catalog::FeatureDefinition;
use super::domain::{CampaignPlan, FeatureSelection, PlanningError, ScoreOptions};
use super::score::ScoreSpecification;
use super::service::PlanningService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub product: String,
    pub target_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSpecRequest {
    pub score: ScoreOptions,
    pub selections: Vec<FeatureSelection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSpecResponse {
    pub spec: ScoreSpecification,
    pub rendered: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub campaign: CampaignPlan,
    pub score: ScoreOptions,
    pub selections: Vec<FeatureSelection>,
}

/// Router exposing the planning pipeline. Each request carries its full plan and selection.
pub fn planning_router(service: Arc<PlanningService>) -> Router {
    Router::new()
        .route("/api/v1/features", get(features_handler))
        .route("/api/v1/products", get(products_handler))
        .route("/api/v1/recommendations", post(recommendation_handler))
        .route("/api/v1/score-spec", post(score_spec_handler))
        .route("/api/v1/export", post(export_handler))
        .with_state(service)
}

pub(crate) async fn features_handler(
    State(service): State<Arc<PlanningService>>,
) -> Json<Vec<FeatureDefinition>> {
    Json(service.catalog().list_all())
}

pub(crate) async fn products_handler(
    State(service): State<Arc<PlanningService>>,
) -> Json<Vec<&'static str>> {
    Json(service.products())
}

pub(crate) async fn recommendation_handler(
    State(service): State<Arc<PlanningService>>,
    Json(request): Json<RecommendationRequest>,
) -> Response {
    match service.recommend(&request.product, request.target_size) {
        Ok(recommendation) => (StatusCode::OK, Json(recommendation)).into_response(),
        Err(error) => planning_error_response(error),
    }
}

pub(crate) async fn score_spec_handler(
    State(service): State<Arc<PlanningService>>,
    Json(request): Json<ScoreSpecRequest>,
) -> Response {
    match service.score_spec(&request.score, &request.selections) {
        Ok(spec) => {
            let rendered = spec.render();
            (StatusCode::OK, Json(ScoreSpecResponse { spec, rendered })).into_response()
        }
        Err(error) => planning_error_response(error),
    }
}

pub(crate) async fn export_handler(
    State(service): State<Arc<PlanningService>>,
    Json(request): Json<ExportRequest>,
) -> Response {
    match service.export(&request.campaign, &request.score, &request.selections) {
        Ok(config) => (StatusCode::OK, Json(config)).into_response(),
        Err(error) => planning_error_response(error),
    }
}

fn planning_error_response(error: PlanningError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}
