//! Campaign targeting planner: feature catalog, product rules, recommendation,
//! score specification and configuration export.
//!
//! Every stage is a pure function of its inputs. `PlanningSession` carries the plan and the
//! user's selection between stages; export is the only step that draws fresh randomness (the
//! run id).

pub mod catalog;
pub mod domain;
pub mod export;
pub mod recommender;
pub mod router;
pub mod rules;
pub mod score;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use catalog::{FeatureCatalog, FeatureDefinition};
pub use domain::{
    Calibration, CampaignPlan, FeatureSelection, Normalization, PlanningError, ScoreOptions,
    MIN_TARGET_SIZE, STANDARD_CHANNELS,
};
pub use export::{ConfigExporter, ExportConfig, ExportNotes, ExportedFeature, ExportedScore};
pub use recommender::{dedup_preserving_order, Recommender, SizeBand};
pub use router::planning_router;
pub use rules::{RecommendationRules, RuleSet, DEFAULT_PRODUCT};
pub use score::{ScoreSpecBuilder, ScoreSpecification};
pub use service::{PlanningService, Recommendation};
pub use session::{PlanningSession, SessionState};
