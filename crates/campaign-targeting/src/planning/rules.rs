/// Product the planning form preselects.
pub const DEFAULT_PRODUCT: &str = "S26 Ultra";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRule {
    pub product: &'static str,
    pub must_have: Vec<&'static str>,
    pub nice_to_have: Vec<&'static str>,
}

/// Must-have and nice-to-have feature keys for one product, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet<'a> {
    pub must_have: &'a [&'static str],
    pub nice_to_have: &'a [&'static str],
}

impl RuleSet<'static> {
    pub const EMPTY: Self = RuleSet {
        must_have: &[],
        nice_to_have: &[],
    };
}

impl RuleSet<'_> {
    pub fn is_empty(&self) -> bool {
        self.must_have.is_empty() && self.nice_to_have.is_empty()
    }
}

/// Static per-product recommendation table.
#[derive(Debug)]
pub struct RecommendationRules {
    rules: Vec<ProductRule>,
}

impl RecommendationRules {
    pub fn standard() -> Self {
        Self {
            rules: standard_product_rules(),
        }
    }

    /// Rules for `product`; unrecognized labels get empty sets so custom offers still plan.
    pub fn rules_for(&self, product: &str) -> RuleSet<'_> {
        self.rules
            .iter()
            .find(|rule| rule.product == product)
            .map(|rule| RuleSet {
                must_have: &rule.must_have,
                nice_to_have: &rule.nice_to_have,
            })
            .unwrap_or(RuleSet::EMPTY)
    }

    pub fn products(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.product).collect()
    }

    pub fn is_known(&self, product: &str) -> bool {
        self.rules.iter().any(|rule| rule.product == product)
    }

    pub fn rules(&self) -> &[ProductRule] {
        &self.rules
    }
}

fn standard_product_rules() -> Vec<ProductRule> {
    vec![
        ProductRule {
            product: DEFAULT_PRODUCT,
            must_have: vec![
                "premium_device_affinity",
                "spec_comparison_behavior",
                "high_value_purchase_history",
            ],
            nice_to_have: vec![
                "s26_content_views_14d",
                "reservation_purchase_propensity",
                "arpu_bucket",
            ],
        },
        ProductRule {
            product: "S26 (Base)",
            must_have: vec![
                "device_change_intent_30d",
                "s26_content_views_14d",
                "campaign_response_rate_90d",
            ],
            nice_to_have: vec![
                "installment_affinity",
                "device_price_sensitivity",
                "channel_conversion_affinity",
            ],
        },
        ProductRule {
            product: "S26 Plus",
            must_have: vec![
                "device_change_intent_30d",
                "spec_comparison_behavior",
                "campaign_response_rate_90d",
            ],
            nice_to_have: vec!["arpu_bucket", "trade_in_affinity", "installment_affinity"],
        },
        ProductRule {
            product: "S26 Ultra + Watch Bundle",
            must_have: vec![
                "premium_device_affinity",
                "bundle_affinity",
                "high_value_purchase_history",
            ],
            nice_to_have: vec![
                "vip_or_priority_segment",
                "arpu_bucket",
                "reservation_purchase_propensity",
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::catalog::FeatureCatalog;

    #[test]
    fn unknown_product_yields_empty_rule_sets() {
        let rules = RecommendationRules::standard();
        let set = rules.rules_for("Custom Foldable Offer");
        assert!(set.is_empty());
        assert!(!rules.is_known("Custom Foldable Offer"));
    }

    #[test]
    fn products_are_listed_in_table_order() {
        let rules = RecommendationRules::standard();
        assert_eq!(
            rules.products(),
            vec![
                "S26 Ultra",
                "S26 (Base)",
                "S26 Plus",
                "S26 Ultra + Watch Bundle"
            ]
        );
    }

    #[test]
    fn every_rule_key_is_defined_in_the_catalog() {
        let rules = RecommendationRules::standard();
        let catalog = FeatureCatalog::standard();
        for rule in rules.rules() {
            for key in rule.must_have.iter().chain(rule.nice_to_have.iter()) {
                assert!(catalog.contains(key), "{} references unknown {key}", rule.product);
            }
        }
    }
}
