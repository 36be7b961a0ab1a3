//! End-to-end planning runs through the public facade: recommend, edit, specify, export.

use campaign_targeting::planning::{
    CampaignPlan, ExportConfig, FeatureSelection, PlanningError, PlanningService, ScoreOptions,
    SessionState, DEFAULT_PRODUCT,
};
use chrono::NaiveDate;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date")
}

#[test]
fn draft_plan_runs_from_recommendation_to_export() {
    let service = PlanningService::default();
    let plan = CampaignPlan::draft(DEFAULT_PRODUCT, start_date());
    let options = ScoreOptions::for_plan(&plan);
    assert_eq!(options.top_n, 50_000);

    let mut session = service.start_session(plan, options);
    assert_eq!(session.state(), SessionState::Planning);

    let recommended = session
        .generate(service.recommender())
        .expect("recommendations generate")
        .to_vec();
    assert_eq!(recommended.len(), 6);

    session
        .set_weight("premium_device_affinity", 3.0)
        .expect("weight updates");
    session
        .set_included("arpu_bucket", false)
        .expect("inclusion updates");

    let spec = session.score_spec().expect("spec builds");
    assert!(spec
        .raw_score_formula
        .starts_with("3.00 * premium_device_affinity + 1.00 * spec_comparison_behavior"));
    assert!(!spec.raw_score_formula.contains("arpu_bucket"));

    let exporter = service.exporter();
    let first = session.export(&exporter).expect("export builds");
    let second = session.export(&exporter).expect("export builds");
    assert_ne!(first.run_id, second.run_id);
    assert!(first.same_content(&second));
    assert_eq!(first.score.features.len(), 5);
    assert_eq!(first.campaign.channels, vec!["SMS", "KakaoTalk"]);

    let json = first.to_json_pretty().expect("serialize");
    let parsed: ExportConfig = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed, first);
}

#[test]
fn custom_product_still_plans_with_size_signals() {
    let service = PlanningService::default();
    let recommendation = service
        .recommend("Z Fold Trade-in Offer", 8_000)
        .expect("recommendation builds");

    assert!(!recommendation.known_product);
    assert_eq!(
        recommendation.keys(),
        vec!["cart_or_apply_signal", "reservation_purchase_propensity"]
    );

    let plan = CampaignPlan::new(
        "Fold trade-in",
        "Z Fold Trade-in Offer",
        8_000,
        start_date(),
        ["App push"],
    )
    .expect("valid plan");
    let options = ScoreOptions::for_plan(&plan);
    let config = service
        .export(&plan, &options, &recommendation.default_selections())
        .expect("export builds");
    assert_eq!(config.score.features.len(), 2);
    assert_eq!(config.score.features[0].group, "Content / behavior");
}

#[test]
fn mid_band_has_no_size_adjustment() {
    let service = PlanningService::default();
    for target_size in [20_001, 60_000, 99_999] {
        let recommendation = service
            .recommend("S26 Ultra", target_size)
            .expect("recommendation builds");
        assert_eq!(recommendation.features.len(), 6);
    }
}

#[test]
fn service_rejects_inputs_the_form_would_block() {
    let service = PlanningService::default();
    assert!(matches!(
        service.recommend("S26 Ultra", 999),
        Err(PlanningError::TargetSizeTooSmall { .. })
    ));

    let plan = CampaignPlan::draft("S26 Plus", start_date());
    let mut options = ScoreOptions::for_plan(&plan);
    options.top_n = 0;
    let selections = service
        .recommend("S26 Plus", plan.target_size)
        .expect("recommendation builds")
        .default_selections();
    assert_eq!(
        service.export(&plan, &options, &selections),
        Err(PlanningError::InvalidTopN)
    );
}

#[test]
fn service_export_rejects_unusable_selections() {
    let service = PlanningService::default();
    let plan = CampaignPlan::draft(DEFAULT_PRODUCT, start_date());
    let options = ScoreOptions::for_plan(&plan);

    assert_eq!(
        service.export(&plan, &options, &[]),
        Err(PlanningError::EmptySelection)
    );

    let all_excluded: Vec<FeatureSelection> = service
        .recommend(DEFAULT_PRODUCT, plan.target_size)
        .expect("recommendation builds")
        .keys()
        .into_iter()
        .map(FeatureSelection::excluded)
        .collect();
    assert_eq!(
        service.export(&plan, &options, &all_excluded),
        Err(PlanningError::EmptySelection)
    );

    let negative = [FeatureSelection::weighted("arpu_bucket", -0.5)];
    assert!(matches!(
        service.export(&plan, &options, &negative),
        Err(PlanningError::NegativeWeight { .. })
    ));

    let repeated = [
        FeatureSelection::new("arpu_bucket"),
        FeatureSelection::weighted("arpu_bucket", 2.0),
    ];
    assert_eq!(
        service.score_spec(&options, &repeated),
        Err(PlanningError::DuplicateSelection("arpu_bucket".to_string()))
    );
}
