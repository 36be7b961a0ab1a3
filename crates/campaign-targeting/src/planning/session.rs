use serde::Serialize;
use tracing::info;

use super::catalog::FeatureDefinition;
use super::domain::{check_weight, CampaignPlan, FeatureSelection, PlanningError, ScoreOptions};
use super::export::{ConfigExporter, ExportConfig};
use super::recommender::Recommender;
use super::score::{included, ScoreSpecBuilder, ScoreSpecification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Plan inputs are editable; nothing has been recommended yet.
    Planning,
    /// Recommendations exist; selections and weights are editable.
    Reviewed,
}

/// One planner's run: plan inputs, score options, and the editable feature selection.
#[derive(Debug, Clone)]
pub struct PlanningSession {
    state: SessionState,
    plan: CampaignPlan,
    options: ScoreOptions,
    recommended: Vec<FeatureDefinition>,
    selections: Vec<FeatureSelection>,
}

impl PlanningSession {
    pub fn new(plan: CampaignPlan, options: ScoreOptions) -> Self {
        Self {
            state: SessionState::Planning,
            plan,
            options,
            recommended: Vec::new(),
            selections: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn plan(&self) -> &CampaignPlan {
        &self.plan
    }

    /// Plan inputs can only change before recommendations are generated.
    pub fn plan_mut(&mut self) -> Result<&mut CampaignPlan, PlanningError> {
        match self.state {
            SessionState::Planning => Ok(&mut self.plan),
            SessionState::Reviewed => Err(PlanningError::AlreadyReviewed),
        }
    }

    pub fn options(&self) -> &ScoreOptions {
        &self.options
    }

    pub fn recommended(&self) -> &[FeatureDefinition] {
        &self.recommended
    }

    pub fn selections(&self) -> &[FeatureSelection] {
        &self.selections
    }

    /// Move from Planning to Reviewed, seeding every recommendation as included with weight 1.0.
    pub fn generate(
        &mut self,
        recommender: &Recommender,
    ) -> Result<&[FeatureDefinition], PlanningError> {
        if self.state == SessionState::Reviewed {
            return Err(PlanningError::AlreadyReviewed);
        }
        self.plan.validate()?;

        self.recommended =
            recommender.recommend_features(&self.plan.product, self.plan.target_size);
        self.selections = self
            .recommended
            .iter()
            .map(|definition| FeatureSelection::new(definition.key.clone()))
            .collect();
        self.state = SessionState::Reviewed;

        info!(
            product = %self.plan.product,
            target_size = self.plan.target_size,
            recommended = self.recommended.len(),
            "recommendations generated"
        );
        Ok(&self.recommended)
    }

    pub fn set_included(&mut self, key: &str, included: bool) -> Result<(), PlanningError> {
        self.selection_mut(key)?.included = included;
        Ok(())
    }

    pub fn set_weight(&mut self, key: &str, weight: f64) -> Result<(), PlanningError> {
        check_weight(key, weight)?;
        self.selection_mut(key)?.weight = weight;
        Ok(())
    }

    /// Reorder a selection; formula terms follow the new order.
    pub fn move_selection(&mut self, key: &str, position: usize) -> Result<(), PlanningError> {
        let from = self.position_of(key)?;
        let len = self.selections.len();
        if position >= len {
            return Err(PlanningError::InvalidPosition { position, len });
        }
        let selection = self.selections.remove(from);
        self.selections.insert(position, selection);
        Ok(())
    }

    pub fn included_count(&self) -> usize {
        included(&self.selections).count()
    }

    pub fn score_spec(&self) -> Result<ScoreSpecification, PlanningError> {
        self.ensure_reviewed()?;
        self.options.validate()?;
        ScoreSpecBuilder::from_options(&self.options, &self.selections)
    }

    /// Fresh export from the current selection; each call yields a new run id.
    pub fn export(&self, exporter: &ConfigExporter<'_>) -> Result<ExportConfig, PlanningError> {
        let spec = self.score_spec()?;
        exporter.export(&self.plan, &spec, &self.selections)
    }

    /// Plain-language recap of the run for stakeholders.
    pub fn summary(&self) -> String {
        let channels = if self.plan.channels.is_empty() {
            "unspecified".to_string()
        } else {
            self.plan.channels.join(", ")
        };

        [
            format!(
                "- Plan captured: {} pre-order campaign, target size {} customers, channels {}",
                self.plan.product,
                thousands(self.plan.target_size),
                channels
            ),
            format!(
                "- Selected {} feature(s) from the recommended candidates, \
                 combined as the weighted sum {}.",
                self.included_count(),
                self.options.name
            ),
            format!(
                "- Post-processing: normalize={}, calibration={}",
                self.options.normalize, self.options.calibration
            ),
            format!(
                "- Final extraction keeps the Top-{} (applied once the engine is connected)",
                thousands(self.options.top_n)
            ),
        ]
        .join("\n")
    }

    fn ensure_reviewed(&self) -> Result<(), PlanningError> {
        match self.state {
            SessionState::Reviewed => Ok(()),
            SessionState::Planning => Err(PlanningError::NotReviewed),
        }
    }

    fn position_of(&self, key: &str) -> Result<usize, PlanningError> {
        self.ensure_reviewed()?;
        self.selections
            .iter()
            .position(|selection| selection.key == key)
            .ok_or_else(|| PlanningError::UnknownSelection(key.to_string()))
    }

    fn selection_mut(&mut self, key: &str) -> Result<&mut FeatureSelection, PlanningError> {
        let index = self.position_of(key)?;
        Ok(&mut self.selections[index])
    }
}

fn thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
