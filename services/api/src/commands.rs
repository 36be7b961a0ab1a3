use crate::infra::{parse_date, parse_weight, WeightOverride};
use campaign_targeting::config::AppConfig;
use campaign_targeting::error::AppError;
use campaign_targeting::planning::domain::{DEFAULT_CAMPAIGN_NAME, DEFAULT_TARGET_SIZE};
use campaign_targeting::planning::{
    Calibration, CampaignPlan, FeatureDefinition, Normalization, PlanningError, PlanningService,
    ScoreOptions, DEFAULT_PRODUCT, STANDARD_CHANNELS,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Emit `group,key,description` CSV instead of the grouped listing
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Product or offer label (unlisted labels receive only size-based suggestions)
    #[arg(long, default_value = DEFAULT_PRODUCT)]
    pub(crate) product: String,
    /// Target audience size (minimum 1000)
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE)]
    pub(crate) target_size: u32,
}

#[derive(Args, Debug)]
pub(crate) struct PlanArgs {
    /// Campaign name
    #[arg(long, default_value = DEFAULT_CAMPAIGN_NAME)]
    pub(crate) name: String,
    /// Product or offer label
    #[arg(long, default_value = DEFAULT_PRODUCT)]
    pub(crate) product: String,
    /// Target audience size (minimum 1000)
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE)]
    pub(crate) target_size: u32,
    /// Campaign start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Delivery channel; repeat for several. Defaults to SMS and KakaoTalk.
    #[arg(long = "channel")]
    pub(crate) channels: Vec<String>,
    /// Score name (defaults to PLANNER_SCORE_NAME)
    #[arg(long)]
    pub(crate) score_name: Option<String>,
    /// Number of customers to extract. Defaults to the target size.
    #[arg(long)]
    pub(crate) top_n: Option<u32>,
    /// None, Min-Max, Z-Score or Quantile(0~1)
    #[arg(long)]
    pub(crate) normalize: Option<Normalization>,
    /// None, Platt or Isotonic
    #[arg(long)]
    pub(crate) calibration: Option<Calibration>,
    /// Drop a recommended feature from the score; repeatable
    #[arg(long)]
    pub(crate) exclude: Vec<String>,
    /// Override a feature weight as KEY=WEIGHT; repeatable
    #[arg(long = "weight", value_parser = parse_weight)]
    pub(crate) weights: Vec<WeightOverride>,
    /// Write the exported JSON here (a directory receives `<score>_config.json`)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let service = PlanningService::default();
    let catalog = service.catalog();

    if args.csv {
        catalog.write_csv(std::io::stdout().lock())?;
        return Ok(());
    }

    for group in catalog.groups() {
        println!("{}", group.label);
        for feature in &group.features {
            println!("- {}: {}", feature.key, feature.description);
        }
        println!();
    }
    Ok(())
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let service = PlanningService::default();
    let recommendation = service.recommend(&args.product, args.target_size)?;

    println!(
        "Recommended features for {} ({} audience, {} band)",
        recommendation.product,
        recommendation.target_size,
        service.size_band(recommendation.target_size).label()
    );
    if !recommendation.known_product {
        println!(
            "Note: '{}' has no product rules; only size-based suggestions apply",
            args.product
        );
    }
    render_features(&recommendation.features);
    Ok(())
}

pub(crate) fn run_plan(args: PlanArgs, config: &AppConfig) -> Result<(), AppError> {
    let service = PlanningService::default();
    let PlanInputs { plan, options } = args.plan_inputs(config)?;
    let mut session = service.start_session(plan, options);

    session.generate(service.recommender())?;
    println!("Recommended feature candidates");
    render_features(session.recommended());

    for key in &args.exclude {
        session.set_included(key, false)?;
    }
    for WeightOverride { key, weight } in &args.weights {
        session.set_weight(key, *weight)?;
    }

    println!("\nScore specification");
    match session.score_spec() {
        Ok(spec) => println!("{}", spec.render()),
        Err(PlanningError::EmptySelection) => {
            warn!("no features selected; score spec and config withheld");
            println!(
                "No features are selected, so the score cannot be built. \
                 Include at least one feature."
            );
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    let export = session.export(&service.exporter())?;
    let json = export.to_json_pretty()?;
    println!("\nEngine configuration");
    println!("{json}");

    if let Some(path) = args.output {
        let path = if path.is_dir() {
            path.join(export.file_name())
        } else {
            path
        };
        std::fs::write(&path, &json)?;
        info!(run_id = %export.run_id, path = %path.display(), "configuration written");
    }

    println!("\nSummary");
    println!("{}", session.summary());
    Ok(())
}

struct PlanInputs {
    plan: CampaignPlan,
    options: ScoreOptions,
}

impl PlanArgs {
    fn plan_inputs(&self, config: &AppConfig) -> Result<PlanInputs, PlanningError> {
        let channels = if self.channels.is_empty() {
            vec![STANDARD_CHANNELS[0].to_string(), STANDARD_CHANNELS[1].to_string()]
        } else {
            self.channels.clone()
        };

        let plan = CampaignPlan::new(
            self.name.clone(),
            self.product.clone(),
            self.target_size,
            self.start_date.unwrap_or_else(|| Local::now().date_naive()),
            channels,
        )?;

        let options = ScoreOptions {
            name: self
                .score_name
                .clone()
                .unwrap_or_else(|| config.planner.score_name.clone()),
            top_n: self.top_n.unwrap_or(plan.target_size),
            normalize: self.normalize.unwrap_or(config.planner.normalize),
            calibration: self.calibration.unwrap_or(config.planner.calibration),
        };
        options.validate()?;

        Ok(PlanInputs { plan, options })
    }
}

fn render_features(features: &[FeatureDefinition]) {
    for (rank, feature) in features.iter().enumerate() {
        println!(
            "{:>2}. {} [{}] {}",
            rank + 1,
            feature.key,
            feature.group,
            feature.description
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_targeting::config::{
        AppEnvironment, LogFormat, PlannerDefaults, ServerConfig, TelemetryConfig,
    };
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct PlanHarness {
        #[command(flatten)]
        plan: PlanArgs,
    }

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            telemetry: TelemetryConfig {
                log_level: "warn".to_string(),
                log_format: LogFormat::Compact,
            },
            planner: PlannerDefaults {
                score_name: "S26_RESERVATION_SCORE".to_string(),
                normalize: Normalization::Quantile0To1,
                calibration: Calibration::None,
            },
        }
    }

    fn parse(args: &[&str]) -> PlanArgs {
        let argv = std::iter::once("plan").chain(args.iter().copied());
        PlanHarness::try_parse_from(argv).expect("args parse").plan
    }

    #[test]
    fn plan_inputs_fall_back_to_form_defaults() {
        let args = parse(&["--start-date", "2026-02-01"]);
        let inputs = args.plan_inputs(&config()).expect("inputs build");

        assert_eq!(inputs.plan.product, "S26 Ultra");
        assert_eq!(inputs.plan.target_size, 50_000);
        assert_eq!(inputs.plan.channels, vec!["SMS", "KakaoTalk"]);
        assert_eq!(inputs.options.top_n, 50_000);
        assert_eq!(inputs.options.normalize, Normalization::Quantile0To1);
    }

    #[test]
    fn plan_flags_override_defaults() {
        let args = parse(&[
            "--product",
            "S26 Plus",
            "--target-size",
            "150000",
            "--channel",
            "Email",
            "--normalize",
            "z-score",
            "--calibration",
            "isotonic",
            "--top-n",
            "90000",
            "--weight",
            "arpu_bucket=2.5",
        ]);
        assert_eq!(args.weights[0].weight, 2.5);

        let inputs = args.plan_inputs(&config()).expect("inputs build");
        assert_eq!(inputs.plan.channels, vec!["Email"]);
        assert_eq!(inputs.options.top_n, 90_000);
        assert_eq!(inputs.options.normalize, Normalization::ZScore);
        assert_eq!(inputs.options.calibration, Calibration::Isotonic);
    }

    #[test]
    fn excluding_everything_withholds_export_without_failing() {
        let args = parse(&[
            "--product",
            "Unlisted Offer",
            "--target-size",
            "10000",
            "--exclude",
            "cart_or_apply_signal",
            "--exclude",
            "reservation_purchase_propensity",
        ]);
        run_plan(args, &config()).expect("plan run completes");
    }

    #[test]
    fn plan_rejects_small_audiences() {
        let args = parse(&["--target-size", "500"]);
        assert!(matches!(
            args.plan_inputs(&config()),
            Err(PlanningError::TargetSizeTooSmall { .. })
        ));
    }
}
