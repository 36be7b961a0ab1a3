use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::recommender::dedup_preserving_order;

/// Smallest audience the planner accepts for a campaign.
pub const MIN_TARGET_SIZE: u32 = 1_000;

pub const DEFAULT_CAMPAIGN_NAME: &str = "Galaxy S26 pre-order targeting";
pub const DEFAULT_TARGET_SIZE: u32 = 50_000;
pub const DEFAULT_SCORE_NAME: &str = "S26_RESERVATION_SCORE";

/// Delivery channels offered by the planning surface. Custom labels are still accepted.
pub const STANDARD_CHANNELS: [&str; 5] = ["SMS", "KakaoTalk", "App push", "Email", "Call/consult"];

/// Campaign inputs captured before recommendations are generated.
///
/// Deserialization goes through [`CampaignPlan::new`], so decoded plans are validated and
/// their channels collapsed the same way as constructed ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CampaignPlanFields")]
pub struct CampaignPlan {
    pub name: String,
    pub product: String,
    pub target_size: u32,
    pub start_date: NaiveDate,
    pub channels: Vec<String>,
}

impl CampaignPlan {
    pub fn new(
        name: impl Into<String>,
        product: impl Into<String>,
        target_size: u32,
        start_date: NaiveDate,
        channels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, PlanningError> {
        let plan = Self {
            name: name.into(),
            product: product.into(),
            target_size,
            start_date,
            channels: dedup_preserving_order(channels),
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Plan pre-filled with the defaults shown on a fresh planning form.
    pub fn draft(product: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            name: DEFAULT_CAMPAIGN_NAME.to_string(),
            product: product.into(),
            target_size: DEFAULT_TARGET_SIZE,
            start_date,
            channels: vec![STANDARD_CHANNELS[0].to_string(), STANDARD_CHANNELS[1].to_string()],
        }
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        check_target_size(self.target_size)
    }
}

#[derive(Deserialize)]
struct CampaignPlanFields {
    name: String,
    product: String,
    target_size: u32,
    start_date: NaiveDate,
    #[serde(default)]
    channels: Vec<String>,
}

impl TryFrom<CampaignPlanFields> for CampaignPlan {
    type Error = PlanningError;

    fn try_from(fields: CampaignPlanFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.name,
            fields.product,
            fields.target_size,
            fields.start_date,
            fields.channels,
        )
    }
}

pub(crate) fn check_target_size(target_size: u32) -> Result<(), PlanningError> {
    if target_size < MIN_TARGET_SIZE {
        return Err(PlanningError::TargetSizeTooSmall {
            target_size,
            minimum: MIN_TARGET_SIZE,
        });
    }
    Ok(())
}

fn default_included() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

/// User-editable inclusion flag and weight for one recommended feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSelection {
    pub key: String,
    #[serde(default = "default_included")]
    pub included: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl FeatureSelection {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            included: default_included(),
            weight: default_weight(),
        }
    }

    pub fn weighted(key: impl Into<String>, weight: f64) -> Self {
        Self {
            weight,
            ..Self::new(key)
        }
    }

    pub fn excluded(key: impl Into<String>) -> Self {
        Self {
            included: false,
            ..Self::new(key)
        }
    }
}

pub(crate) fn check_weight(key: &str, weight: f64) -> Result<(), PlanningError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(PlanningError::NegativeWeight {
            key: key.to_string(),
            weight,
        })
    }
}

/// Post-processing applied to the raw weighted sum by the downstream engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Normalization {
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Min-Max")]
    MinMax,
    #[serde(rename = "Z-Score")]
    ZScore,
    #[default]
    #[serde(rename = "Quantile(0~1)")]
    Quantile0To1,
}

impl Normalization {
    pub const fn ordered() -> [Self; 4] {
        [Self::None, Self::MinMax, Self::ZScore, Self::Quantile0To1]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::MinMax => "Min-Max",
            Self::ZScore => "Z-Score",
            Self::Quantile0To1 => "Quantile(0~1)",
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Normalization {
    type Err = PlanningError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match squash(raw).as_str() {
            "none" => Ok(Self::None),
            "minmax" => Ok(Self::MinMax),
            "zscore" => Ok(Self::ZScore),
            "quantile" | "quantile(0~1)" | "quantile0to1" => Ok(Self::Quantile0To1),
            _ => Err(PlanningError::InvalidNormalization(raw.to_string())),
        }
    }
}

/// Probability calibration strategy named in the exported configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Calibration {
    #[default]
    None,
    Platt,
    Isotonic,
}

impl Calibration {
    pub const fn ordered() -> [Self; 3] {
        [Self::None, Self::Platt, Self::Isotonic]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Platt => "Platt",
            Self::Isotonic => "Isotonic",
        }
    }
}

impl fmt::Display for Calibration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Calibration {
    type Err = PlanningError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match squash(raw).as_str() {
            "none" => Ok(Self::None),
            "platt" => Ok(Self::Platt),
            "isotonic" => Ok(Self::Isotonic),
            _ => Err(PlanningError::InvalidCalibration(raw.to_string())),
        }
    }
}

fn squash(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['-', '_', ' '], "")
}

/// Score naming and post-processing choices made alongside the campaign plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOptions {
    pub name: String,
    pub top_n: u32,
    #[serde(default)]
    pub normalize: Normalization,
    #[serde(default)]
    pub calibration: Calibration,
}

impl ScoreOptions {
    /// Options seeded from a plan: Top-N follows the campaign's target size.
    pub fn for_plan(plan: &CampaignPlan) -> Self {
        Self {
            name: DEFAULT_SCORE_NAME.to_string(),
            top_n: plan.target_size,
            normalize: Normalization::default(),
            calibration: Calibration::default(),
        }
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        if self.top_n == 0 {
            return Err(PlanningError::InvalidTopN);
        }
        Ok(())
    }
}

/// Recoverable conditions raised while planning; none of them end the session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanningError {
    #[error("no features selected; include at least one feature to build the score")]
    EmptySelection,
    #[error("target size {target_size} is below the minimum of {minimum}")]
    TargetSizeTooSmall { target_size: u32, minimum: u32 },
    #[error("top-n must be at least 1")]
    InvalidTopN,
    #[error("weight for '{key}' must be a finite, non-negative number (got {weight})")]
    NegativeWeight { key: String, weight: f64 },
    #[error("feature '{0}' is not part of the current selection")]
    UnknownSelection(String),
    #[error("feature '{0}' appears more than once in the selection")]
    DuplicateSelection(String),
    #[error("position {position} is out of range for {len} selections")]
    InvalidPosition { position: usize, len: usize },
    #[error("recommendations were already generated for this session")]
    AlreadyReviewed,
    #[error("generate recommendations before editing selections or exporting")]
    NotReviewed,
    #[error("unknown normalization '{0}' (expected None, Min-Max, Z-Score or Quantile(0~1))")]
    InvalidNormalization(String),
    #[error("unknown calibration '{0}' (expected None, Platt or Isotonic)")]
    InvalidCalibration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date")
    }

    #[test]
    fn plan_rejects_audiences_below_minimum() {
        let err = CampaignPlan::new("launch", "S26 Ultra", 999, start(), ["SMS"])
            .expect_err("target size too small");
        assert_eq!(
            err,
            PlanningError::TargetSizeTooSmall {
                target_size: 999,
                minimum: MIN_TARGET_SIZE
            }
        );
    }

    #[test]
    fn plan_collapses_repeated_channels() {
        let plan = CampaignPlan::new("launch", "S26 Ultra", 1_000, start(), ["SMS", "Email", "SMS"])
            .expect("plan builds");
        assert_eq!(plan.channels, vec!["SMS", "Email"]);
    }

    #[test]
    fn decoded_plans_collapse_channels_and_check_size() {
        let plan: CampaignPlan = serde_json::from_str(
            r#"{"name":"launch","product":"S26 Ultra","target_size":5000,
                "start_date":"2026-02-01","channels":["SMS","SMS","Email"]}"#,
        )
        .expect("deserialize");
        assert_eq!(plan.channels, vec!["SMS", "Email"]);

        let err = serde_json::from_str::<CampaignPlan>(
            r#"{"name":"launch","product":"S26 Ultra","target_size":10,
                "start_date":"2026-02-01","channels":["SMS"]}"#,
        )
        .expect_err("target size too small");
        assert!(err.to_string().contains("below the minimum"));
    }

    #[test]
    fn normalization_parses_labels_and_aliases() {
        assert_eq!("Min-Max".parse::<Normalization>(), Ok(Normalization::MinMax));
        assert_eq!("z_score".parse::<Normalization>(), Ok(Normalization::ZScore));
        assert_eq!(
            "Quantile(0~1)".parse::<Normalization>(),
            Ok(Normalization::Quantile0To1)
        );
        assert!(matches!(
            "softmax".parse::<Normalization>(),
            Err(PlanningError::InvalidNormalization(_))
        ));
    }

    #[test]
    fn enums_serialize_to_display_labels() {
        let value = serde_json::to_value(Normalization::Quantile0To1).expect("serialize");
        assert_eq!(value, serde_json::json!("Quantile(0~1)"));
        let value = serde_json::to_value(Calibration::Isotonic).expect("serialize");
        assert_eq!(value, serde_json::json!("Isotonic"));
    }

    #[test]
    fn selection_defaults_apply_when_fields_are_missing() {
        let selection: FeatureSelection =
            serde_json::from_str(r#"{"key":"arpu_bucket"}"#).expect("deserialize");
        assert_eq!(selection, FeatureSelection::new("arpu_bucket"));
    }

    #[test]
    fn weights_must_be_finite_and_non_negative() {
        assert!(check_weight("a", 0.0).is_ok());
        assert!(check_weight("a", -0.1).is_err());
        assert!(check_weight("a", f64::NAN).is_err());
    }
}
