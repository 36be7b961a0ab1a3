mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use campaign_targeting::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
