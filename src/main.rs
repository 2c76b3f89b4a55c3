use qdrant_populator::{OpenAiEmbedder, PopulateConfig, PopulateError, Populator};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from a .env file when present.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        error!("populate run aborted: {e}");
    }
}

async fn run() -> Result<(), PopulateError> {
    let cfg = PopulateConfig::from_env()?;
    let embedder = OpenAiEmbedder::new(&cfg)?;
    let populator = Populator::new(cfg)?;

    let submitted = populator.run(&embedder).await?;
    info!("Done: {submitted} points upserted");
    Ok(())
}
