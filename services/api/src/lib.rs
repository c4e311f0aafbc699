mod cli;
mod demo;
mod infra;
mod routes;
mod score;
mod server;

use promotion_desk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
