use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::catalog::FeatureCatalog;
use super::domain::{CampaignPlan, Calibration, FeatureSelection, Normalization, PlanningError};
use super::score::{included, ScoreSpecification};

/// Follow-up work attached to every exported configuration.
pub const FOLLOW_UP_WORK: [&str; 3] = [
    "Connect the real scoring engine here (BQ / model / rule-based)",
    "Document feature definitions and scale direction (+) (-)",
    "Handle missing values, outliers, and duplicate customers",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedFeature {
    pub key: String,
    pub weight: f64,
    pub group: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedScore {
    pub name: String,
    pub top_n: u32,
    pub normalize: Normalization,
    pub calibration: Calibration,
    pub features: Vec<ExportedFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNotes {
    pub mvp: bool,
    pub todo: Vec<String>,
}

impl ExportNotes {
    pub fn advisory() -> Self {
        Self {
            mvp: true,
            todo: FOLLOW_UP_WORK.iter().map(|item| item.to_string()).collect(),
        }
    }
}

/// Configuration handed to the downstream scoring engine. Field order is part of the format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub run_id: Uuid,
    pub campaign: CampaignPlan,
    pub score: ExportedScore,
    pub notes: ExportNotes,
}

impl ExportConfig {
    /// Suggested download name, e.g. `S26_RESERVATION_SCORE_config.json`.
    pub fn file_name(&self) -> String {
        format!("{}_config.json", self.score.name)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Same content, ignoring the per-export run id.
    pub fn same_content(&self, other: &Self) -> bool {
        self.campaign == other.campaign && self.score == other.score && self.notes == other.notes
    }
}

/// Builds export records; holds the catalog used to describe selected features.
#[derive(Debug)]
pub struct ConfigExporter<'a> {
    catalog: &'a FeatureCatalog,
}

impl<'a> ConfigExporter<'a> {
    pub fn new(catalog: &'a FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Snapshot plan, spec and included selections under a freshly generated run id.
    pub fn export(
        &self,
        plan: &CampaignPlan,
        spec: &ScoreSpecification,
        selections: &[FeatureSelection],
    ) -> Result<ExportConfig, PlanningError> {
        let features: Vec<ExportedFeature> = included(selections)
            .map(|selection| {
                let definition = self.catalog.lookup(&selection.key);
                ExportedFeature {
                    key: selection.key.clone(),
                    weight: selection.weight,
                    group: definition.group,
                    desc: definition.description,
                }
            })
            .collect();

        if features.is_empty() {
            return Err(PlanningError::EmptySelection);
        }

        let config = ExportConfig {
            run_id: Uuid::new_v4(),
            campaign: plan.clone(),
            score: ExportedScore {
                name: spec.score_name.clone(),
                top_n: spec.top_n,
                normalize: spec.normalize,
                calibration: spec.calibration,
                features,
            },
            notes: ExportNotes::advisory(),
        };

        info!(
            run_id = %config.run_id,
            product = %plan.product,
            features = config.score.features.len(),
            "exported targeting configuration"
        );
        Ok(config)
    }
}
