use crate::commands::{run_catalog, run_plan, run_recommend, CatalogArgs, PlanArgs, RecommendArgs};
use crate::server;
use campaign_targeting::config::AppConfig;
use campaign_targeting::error::AppError;
use campaign_targeting::telemetry;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campaign Targeting Planner",
    about = "Recommend scoring features, design a weighted score, and export engine configuration",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the feature catalog grouped by category
    Catalog(CatalogArgs),
    /// Show recommended features for a product and audience size
    Recommend(RecommendArgs),
    /// Run a full plan: recommend, apply edits, render the score spec and export the config
    Plan(PlanArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(args, config).await,
        Command::Catalog(args) => run_catalog(args),
        Command::Recommend(args) => run_recommend(args),
        Command::Plan(args) => run_plan(args, &config),
    }
}
