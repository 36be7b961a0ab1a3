use serde::{Deserialize, Serialize};
use std::io::Write;

pub const OTHER_GROUP: &str = "other";
pub const UNDEFINED_DESCRIPTION: &str = "(definition needed)";

/// Resolved metadata for one scoring feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub group: String,
    pub key: String,
    pub description: String,
}

impl FeatureDefinition {
    /// Stand-in for keys the catalog does not define.
    pub fn placeholder(key: &str) -> Self {
        Self {
            group: OTHER_GROUP.to_string(),
            key: key.to_string(),
            description: UNDEFINED_DESCRIPTION.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.group == OTHER_GROUP && self.description == UNDEFINED_DESCRIPTION
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureEntry {
    pub key: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup {
    pub label: &'static str,
    pub features: Vec<FeatureEntry>,
}

/// Static registry of scoring features, grouped by category in declaration order.
#[derive(Debug)]
pub struct FeatureCatalog {
    groups: Vec<FeatureGroup>,
}

impl FeatureCatalog {
    pub fn standard() -> Self {
        Self {
            groups: standard_feature_groups(),
        }
    }

    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Resolve a key to its definition, falling back to a placeholder for unknown keys.
    pub fn lookup(&self, key: &str) -> FeatureDefinition {
        match self.find(key) {
            Some((group, entry)) => FeatureDefinition {
                group: group.to_string(),
                key: entry.key.to_string(),
                description: entry.description.to_string(),
            },
            None => FeatureDefinition::placeholder(key),
        }
    }

    pub fn list_all(&self) -> Vec<FeatureDefinition> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.features.iter().map(|entry| FeatureDefinition {
                    group: group.label.to_string(),
                    key: entry.key.to_string(),
                    description: entry.description.to_string(),
                })
            })
            .collect()
    }

    /// Write the `list_all` rows as `group,key,description` CSV with a header.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["group", "key", "description"])?;
        for definition in self.list_all() {
            csv_writer.write_record([
                definition.group.as_str(),
                definition.key.as_str(),
                definition.description.as_str(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    fn find(&self, key: &str) -> Option<(&'static str, &FeatureEntry)> {
        self.groups.iter().find_map(|group| {
            group
                .features
                .iter()
                .find(|entry| entry.key == key)
                .map(|entry| (group.label, entry))
        })
    }
}

fn standard_feature_groups() -> Vec<FeatureGroup> {
    vec![
        FeatureGroup {
            label: "Device change intent / handset",
            features: vec![
                FeatureEntry {
                    key: "device_change_intent_30d",
                    description: "Device change intent over the last 30 days (model and plan browsing)",
                },
                FeatureEntry {
                    key: "premium_device_affinity",
                    description: "Premium device affinity (interest in Galaxy flagship and foldables)",
                },
                FeatureEntry {
                    key: "current_device_age_months",
                    description: "Months in use of the current device",
                },
                FeatureEntry {
                    key: "device_price_sensitivity",
                    description: "Price sensitivity (promotion response, preference for low-cost devices)",
                },
            ],
        },
        FeatureGroup {
            label: "Purchase / response",
            features: vec![
                FeatureEntry {
                    key: "campaign_response_rate_90d",
                    description: "Campaign response rate over the last 90 days",
                },
                FeatureEntry {
                    key: "high_value_purchase_history",
                    description: "High-value purchase or upgrade history",
                },
                FeatureEntry {
                    key: "reservation_purchase_propensity",
                    description: "Pre-order purchase propensity (past pre-order participation)",
                },
                FeatureEntry {
                    key: "channel_conversion_affinity",
                    description: "Channel conversion preference (SMS, KakaoTalk, app push)",
                },
            ],
        },
        FeatureGroup {
            label: "Content / behavior",
            features: vec![
                FeatureEntry {
                    key: "s26_content_views_14d",
                    description: "S26 content views and dwell time over the last 14 days",
                },
                FeatureEntry {
                    key: "spec_comparison_behavior",
                    description: "Spec comparison browsing (camera, battery and chipset pages)",
                },
                FeatureEntry {
                    key: "cart_or_apply_signal",
                    description: "Cart, application or consultation signal (right before purchase)",
                },
            ],
        },
        FeatureGroup {
            label: "Customer value / retention",
            features: vec![
                FeatureEntry {
                    key: "arpu_bucket",
                    description: "ARPU bucket (high / mid / low)",
                },
                FeatureEntry {
                    key: "tenure_months",
                    description: "Subscription tenure in months",
                },
                FeatureEntry {
                    key: "churn_risk_score",
                    description: "Churn risk score",
                },
                FeatureEntry {
                    key: "vip_or_priority_segment",
                    description: "VIP or priority customer segment",
                },
            ],
        },
        FeatureGroup {
            label: "Benefit / promotion fit",
            features: vec![
                FeatureEntry {
                    key: "trade_in_affinity",
                    description: "Trade-in program preference",
                },
                FeatureEntry {
                    key: "installment_affinity",
                    description: "Installment and card benefit preference",
                },
                FeatureEntry {
                    key: "bundle_affinity",
                    description: "Bundle and add-on service preference",
                },
            ],
        },
    ]
}
