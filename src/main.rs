// Unsent - a terminal sanctuary for unspoken feelings
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use unsent::analysis::{EmotionClassifier, InsightGenerator};
use unsent::claude::ClaudeClient;
use unsent::cli::Shell;
use unsent::config::{load_config, load_config_from};
use unsent::journal::JournalStore;

#[derive(Parser)]
#[command(name = "unsent", version, about = "A sanctuary for your unspoken feelings")]
struct Cli {
    /// Read settings from this file instead of ~/.unsent/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the journal in this directory instead of ~/.unsent/journal
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the screens
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("UNSENT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Open the journal
    let store = JournalStore::open(&config.data_dir)?;

    // Create the Claude client and the two readers sharing it
    let mut client = ClaudeClient::new(config.api_key.clone(), config.request_timeout_secs)?;
    if let Some(base_url) = &config.api_base_url {
        client = client.with_base_url(base_url.as_str());
    }
    let classifier =
        EmotionClassifier::new(client.clone(), config.model.clone(), config.max_tokens);
    let insight = InsightGenerator::new(client, config.model, config.max_tokens);

    // Create and run the shell
    let mut shell = Shell::new(
        store,
        classifier,
        insight,
        config.reflection_delay_minutes,
        Duration::from_secs(config.request_timeout_secs),
    );

    shell.run().await?;

    Ok(())
}
