use anyhow::Result;
use clinic_scheduler::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
