use std::collections::HashSet;

use crate::planning::{RecommendationRules, Recommender};

#[test]
fn ultra_mid_band_is_rules_in_order() {
    let recommender = Recommender::standard();
    assert_eq!(
        recommender.recommend("S26 Ultra", 50_000),
        vec![
            "premium_device_affinity",
            "spec_comparison_behavior",
            "high_value_purchase_history",
            "s26_content_views_14d",
            "reservation_purchase_propensity",
            "arpu_bucket",
        ]
    );
}

#[test]
fn base_small_audience_appends_precision_signals() {
    let recommender = Recommender::standard();
    assert_eq!(
        recommender.recommend("S26 (Base)", 15_000),
        vec![
            "device_change_intent_30d",
            "s26_content_views_14d",
            "campaign_response_rate_90d",
            "installment_affinity",
            "device_price_sensitivity",
            "channel_conversion_affinity",
            "cart_or_apply_signal",
            "reservation_purchase_propensity",
        ]
    );
}

#[test]
fn plus_broad_audience_dedups_against_must_have() {
    let recommender = Recommender::standard();
    assert_eq!(
        recommender.recommend("S26 Plus", 150_000),
        vec![
            "device_change_intent_30d",
            "spec_comparison_behavior",
            "campaign_response_rate_90d",
            "arpu_bucket",
            "trade_in_affinity",
            "installment_affinity",
        ]
    );
}

#[test]
fn ultra_small_audience_does_not_repeat_existing_nice_to_have() {
    let recommender = Recommender::standard();
    let keys = recommender.recommend("S26 Ultra", 20_000);
    assert_eq!(
        &keys[3..],
        &[
            "s26_content_views_14d",
            "reservation_purchase_propensity",
            "arpu_bucket",
            "cart_or_apply_signal",
        ]
    );
}

#[test]
fn every_product_and_band_is_unique_with_must_have_first() {
    let recommender = Recommender::standard();
    let rules = RecommendationRules::standard();

    for product in rules.products() {
        let rule_set = rules.rules_for(product);
        for target_size in [1_000, 20_000, 20_001, 50_000, 99_999, 100_000, 500_000] {
            let keys = recommender.recommend(product, target_size);

            let unique: HashSet<_> = keys.iter().collect();
            assert_eq!(unique.len(), keys.len(), "{product}@{target_size} has duplicates");

            assert_eq!(
                &keys[..rule_set.must_have.len()],
                rule_set.must_have,
                "{product}@{target_size} must lead with must-have keys"
            );
            assert_eq!(
                keys,
                recommender.recommend(product, target_size),
                "recommendations must be deterministic"
            );
        }
    }
}

#[test]
fn recommended_features_carry_catalog_metadata() {
    let recommender = Recommender::standard();
    let features = recommender.recommend_features("S26 Ultra + Watch Bundle", 50_000);
    assert_eq!(features[1].key, "bundle_affinity");
    assert_eq!(features[1].group, "Benefit / promotion fit");
    assert!(features.iter().all(|feature| !feature.is_placeholder()));
}
