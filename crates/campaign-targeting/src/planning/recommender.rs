use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use super::catalog::{FeatureCatalog, FeatureDefinition};
use super::rules::RecommendationRules;

pub const PRECISION_MAX_TARGET: u32 = 20_000;
pub const BROAD_MIN_TARGET: u32 = 100_000;

/// Audience-size band that decides which extra nice-to-have features apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBand {
    /// Small audiences lean on pre-purchase signals.
    Precision,
    Standard,
    /// Large audiences lean on broad response and intent signals.
    Broad,
}

impl SizeBand {
    pub fn for_target(target_size: u32) -> Self {
        if target_size <= PRECISION_MAX_TARGET {
            Self::Precision
        } else if target_size >= BROAD_MIN_TARGET {
            Self::Broad
        } else {
            Self::Standard
        }
    }

    pub const fn extra_nice_to_have(self) -> &'static [&'static str] {
        match self {
            Self::Precision => &["cart_or_apply_signal", "reservation_purchase_propensity"],
            Self::Standard => &[],
            Self::Broad => &["campaign_response_rate_90d", "device_change_intent_30d"],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Precision => "precision",
            Self::Standard => "standard",
            Self::Broad => "broad",
        }
    }
}

/// Keep the first occurrence of each item, preserving input order.
pub fn dedup_preserving_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for item in items {
        let item = item.into();
        if seen.insert(item.clone()) {
            ordered.push(item);
        }
    }
    ordered
}

/// Combines the catalog and rule table into a ranked candidate list.
#[derive(Debug)]
pub struct Recommender {
    catalog: FeatureCatalog,
    rules: RecommendationRules,
}

impl Recommender {
    pub fn new(catalog: FeatureCatalog, rules: RecommendationRules) -> Self {
        Self { catalog, rules }
    }

    pub fn standard() -> Self {
        Self::new(FeatureCatalog::standard(), RecommendationRules::standard())
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RecommendationRules {
        &self.rules
    }

    /// Ranked, duplicate-free feature keys: must-have first, then size-adjusted nice-to-have.
    pub fn recommend(&self, product: &str, target_size: u32) -> Vec<String> {
        let rule_set = self.rules.rules_for(product);
        let band = SizeBand::for_target(target_size);

        let nice_to_have = dedup_preserving_order(
            rule_set
                .nice_to_have
                .iter()
                .chain(band.extra_nice_to_have())
                .copied(),
        );
        let keys = dedup_preserving_order(
            rule_set
                .must_have
                .iter()
                .map(|key| key.to_string())
                .chain(nice_to_have),
        );

        debug!(
            product,
            target_size,
            band = band.label(),
            count = keys.len(),
            "recommended features"
        );
        keys
    }

    /// Catalog metadata for each recommended key, in recommendation order.
    pub fn recommend_features(&self, product: &str, target_size: u32) -> Vec<FeatureDefinition> {
        self.recommend(product, target_size)
            .iter()
            .map(|key| self.catalog.lookup(key))
            .collect()
    }
}
