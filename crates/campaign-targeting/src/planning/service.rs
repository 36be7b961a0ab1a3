use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::catalog::{FeatureCatalog, FeatureDefinition};
use super::domain::{
    check_target_size, check_weight, CampaignPlan, FeatureSelection, PlanningError, ScoreOptions,
};
use super::export::{ConfigExporter, ExportConfig};
use super::recommender::{Recommender, SizeBand};
use super::score::{ScoreSpecBuilder, ScoreSpecification};
use super::session::PlanningSession;

/// Ranked candidates for one product and audience size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product: String,
    pub target_size: u32,
    pub known_product: bool,
    pub features: Vec<FeatureDefinition>,
}

impl Recommendation {
    pub fn keys(&self) -> Vec<&str> {
        self.features.iter().map(|feature| feature.key.as_str()).collect()
    }

    /// Default selections: every candidate included at weight 1.0.
    pub fn default_selections(&self) -> Vec<FeatureSelection> {
        self.features
            .iter()
            .map(|feature| FeatureSelection::new(feature.key.clone()))
            .collect()
    }
}

/// Stateless facade over the planning pipeline used by the CLI and HTTP layers.
#[derive(Debug)]
pub struct PlanningService {
    recommender: Recommender,
}

impl Default for PlanningService {
    fn default() -> Self {
        Self::new(Recommender::standard())
    }
}

impl PlanningService {
    pub fn new(recommender: Recommender) -> Self {
        Self { recommender }
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        self.recommender.catalog()
    }

    pub fn products(&self) -> Vec<&'static str> {
        self.recommender.rules().products()
    }

    pub fn exporter(&self) -> ConfigExporter<'_> {
        ConfigExporter::new(self.catalog())
    }

    pub fn start_session(&self, plan: CampaignPlan, options: ScoreOptions) -> PlanningSession {
        PlanningSession::new(plan, options)
    }

    pub fn recommend(
        &self,
        product: &str,
        target_size: u32,
    ) -> Result<Recommendation, PlanningError> {
        check_target_size(target_size)?;

        Ok(Recommendation {
            product: product.to_string(),
            target_size,
            known_product: self.recommender.rules().is_known(product),
            features: self.recommender.recommend_features(product, target_size),
        })
    }

    pub fn size_band(&self, target_size: u32) -> SizeBand {
        SizeBand::for_target(target_size)
    }

    pub fn score_spec(
        &self,
        options: &ScoreOptions,
        selections: &[FeatureSelection],
    ) -> Result<ScoreSpecification, PlanningError> {
        options.validate()?;
        let mut seen = HashSet::new();
        for selection in selections {
            if !seen.insert(selection.key.as_str()) {
                return Err(PlanningError::DuplicateSelection(selection.key.clone()));
            }
            check_weight(&selection.key, selection.weight)?;
        }
        ScoreSpecBuilder::from_options(options, selections)
    }

    pub fn export(
        &self,
        plan: &CampaignPlan,
        options: &ScoreOptions,
        selections: &[FeatureSelection],
    ) -> Result<ExportConfig, PlanningError> {
        plan.validate()?;
        let spec = self.score_spec(options, selections)?;
        self.exporter().export(plan, &spec, selections)
    }
}
