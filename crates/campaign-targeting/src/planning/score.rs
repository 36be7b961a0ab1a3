use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Calibration, FeatureSelection, Normalization, PlanningError, ScoreOptions};

/// Declarative description of how the downstream engine should compute a ranking score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSpecification {
    pub score_name: String,
    pub raw_score_formula: String,
    pub normalize: Normalization,
    pub calibration: Calibration,
    pub top_n: u32,
}

impl ScoreSpecification {
    /// Text rendering shown to planners for review.
    pub fn render(&self) -> String {
        format!(
            "[Score Spec]\n\
             score_name: {}\n\
             \n\
             raw_score = {}\n\
             \n\
             post_process:\n  \
             normalize: {}\n  \
             calibration: {}\n\
             \n\
             selection:\n  \
             top_n: {}",
            self.score_name, self.raw_score_formula, self.normalize, self.calibration, self.top_n
        )
    }
}

/// Included selections in presentation order.
pub fn included(selections: &[FeatureSelection]) -> impl Iterator<Item = &FeatureSelection> {
    selections.iter().filter(|selection| selection.included)
}

/// Weighted-sum formula over the included selections, or `None` when nothing is included.
pub fn weighted_sum_formula(selections: &[FeatureSelection]) -> Option<String> {
    let terms: Vec<String> = included(selections)
        .map(|selection| format!("{:.2} * {}", selection.weight, selection.key))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" + "))
    }
}

pub struct ScoreSpecBuilder;

impl ScoreSpecBuilder {
    /// Assemble a score specification. Post-processing options are passed through verbatim.
    pub fn build(
        score_name: &str,
        selections: &[FeatureSelection],
        normalize: Normalization,
        calibration: Calibration,
        top_n: u32,
    ) -> Result<ScoreSpecification, PlanningError> {
        let Some(raw_score_formula) = weighted_sum_formula(selections) else {
            warn!(score_name, "score spec withheld: no features selected");
            return Err(PlanningError::EmptySelection);
        };

        debug!(score_name, formula = %raw_score_formula, "score spec built");
        Ok(ScoreSpecification {
            score_name: score_name.to_string(),
            raw_score_formula,
            normalize,
            calibration,
            top_n,
        })
    }

    pub fn from_options(
        options: &ScoreOptions,
        selections: &[FeatureSelection],
    ) -> Result<ScoreSpecification, PlanningError> {
        Self::build(
            &options.name,
            selections,
            options.normalize,
            options.calibration,
            options.top_n,
        )
    }
}
