// Argonaut ARGO Data Explorer
// Main entry point for the argonaut binary

use argonaut_engine::cli::{Cli, Command, ConfigAction};
use argonaut_engine::config::Config;
use argonaut_engine::handlers::{
    handle_ask, handle_config_init, handle_config_show, handle_seed, handle_status, OutputFormat,
};
use argonaut_engine::telemetry::{init_telemetry, init_telemetry_with_level};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize basic telemetry first (before config is loaded)
    init_telemetry();

    tracing::info!("Argonaut v{}", env!("CARGO_PKG_VERSION"));

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // Re-initialize telemetry with the flag or config-driven log level
    // (only takes effect if RUST_LOG env var is not set)
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    // Handle commands
    match cli.command {
        Command::Ask { question } => {
            tracing::info!("Answering question: {}", question);
            handle_ask(question, &config, format).await
        }

        Command::Seed => {
            tracing::info!("Loading demo dataset...");
            handle_seed(&config, format).await
        }

        Command::Status => {
            tracing::info!("Checking profile store status...");
            handle_status(&config, format).await
        }

        Command::Config { action } => match action {
            ConfigAction::Show => handle_config_show(&config, format),
            // load_or_create above already wrote the default file if needed
            ConfigAction::Init => handle_config_init(format),
        },
    }
}
