use axum::body::to_bytes;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::planning::{
    CampaignPlan, Calibration, FeatureSelection, Normalization, PlanningService, ScoreOptions,
};

pub(super) fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date")
}

pub(super) fn plan(product: &str, target_size: u32) -> CampaignPlan {
    CampaignPlan::new(
        "Galaxy S26 pre-order targeting",
        product,
        target_size,
        start_date(),
        ["SMS", "KakaoTalk"],
    )
    .expect("valid plan")
}

pub(super) fn options(top_n: u32) -> ScoreOptions {
    ScoreOptions {
        name: "S26_RESERVATION_SCORE".to_string(),
        top_n,
        normalize: Normalization::Quantile0To1,
        calibration: Calibration::None,
    }
}

pub(super) fn selections(entries: &[(&str, f64)]) -> Vec<FeatureSelection> {
    entries
        .iter()
        .map(|(key, weight)| FeatureSelection::weighted(*key, *weight))
        .collect()
}

pub(super) fn service() -> PlanningService {
    PlanningService::default()
}

pub(super) async fn json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}
