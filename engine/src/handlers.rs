//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - ask: run one question through the pipeline and render the answer
//! - seed: load the bundled demo dataset
//! - status: show profile store counts
//! - config show/init: inspect or create the configuration
//!
//! Pipeline failures are rendered as the same plain-language explanations a
//! chat surface would show; they are not process failures.

use anyhow::{Context, Result};
use chrono::Utc;
use sdk::errors::ExplorerErrorExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::{seed_demo, Database};
use crate::interpreter::Interpreter;
use crate::session::{Session, SubmitOutcome};
use crate::view::ViewModel;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Ask one question and render the answer
pub async fn handle_ask(question: String, config: &Config, format: OutputFormat) -> Result<()> {
    let database = Database::new(&config.store.db_path)
        .await
        .context("Failed to open database")?;

    let interpreter =
        Interpreter::new(&config.interpreter).context("Failed to build interpreter")?;
    let session = Session::new(
        interpreter,
        Arc::new(database.store()),
        Duration::from_secs(config.store.query_timeout_secs),
    );

    match session.submit(&question, Utc::now()).await {
        Ok(SubmitOutcome::Answered(view)) => render_view(&view, format),
        Ok(SubmitOutcome::Cancelled) => match format {
            OutputFormat::Text => println!("Cancelled."),
            OutputFormat::Json => println!("{}", json!({ "cancelled": true })),
        },
        Err(e) => match format {
            OutputFormat::Text => println!("{}. {}", e, e.user_hint()),
            OutputFormat::Json => println!(
                "{}",
                json!({
                    "error": e.to_string(),
                    "hint": e.user_hint(),
                    "recoverable": e.is_recoverable(),
                })
            ),
        },
    }

    database.close().await?;
    Ok(())
}

/// Load the bundled demo dataset
pub async fn handle_seed(config: &Config, format: OutputFormat) -> Result<()> {
    let database = Database::new(&config.store.db_path)
        .await
        .context("Failed to open database")?;

    let summary = seed_demo(&database).await?;

    match format {
        OutputFormat::Text => println!(
            "Loaded {} demo profiles from {} floats into {}",
            summary.profiles,
            summary.floats,
            config.store.db_path.display()
        ),
        OutputFormat::Json => println!(
            "{}",
            json!({
                "profiles": summary.profiles,
                "floats": summary.floats,
                "db_path": config.store.db_path,
            })
        ),
    }

    database.close().await?;
    Ok(())
}

/// Show profile store status
pub async fn handle_status(config: &Config, format: OutputFormat) -> Result<()> {
    let database = Database::new(&config.store.db_path)
        .await
        .context("Failed to open database")?;
    let repo = database.profiles();

    let profiles = repo.count_profiles().await?;
    let floats = repo.count_floats().await?;

    match format {
        OutputFormat::Text => {
            println!("Profile store: {}", config.store.db_path.display());
            println!("  Profiles: {}", profiles);
            println!("  Floats:   {}", floats);
        }
        OutputFormat::Json => println!(
            "{}",
            json!({
                "db_path": config.store.db_path,
                "profiles": profiles,
                "floats": floats,
            })
        ),
    }

    database.close().await?;
    Ok(())
}

/// Print the active configuration
pub fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let rendered =
                toml::to_string_pretty(config).context("Failed to serialize config")?;
            println!("{}", rendered);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }
    Ok(())
}

/// Report where the configuration lives after `load_or_create` ensured it
/// exists
pub fn handle_config_init(format: OutputFormat) -> Result<()> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".argonaut").join("config.toml");

    match format {
        OutputFormat::Text => println!("Configuration ready at {}", path.display()),
        OutputFormat::Json => println!("{}", json!({ "config_path": path })),
    }
    Ok(())
}

/// Render an answered view model
fn render_view(view: &ViewModel, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            // The view model is the machine-readable answer
            match serde_json::to_string_pretty(view) {
                Ok(rendered) => println!("{}", rendered),
                Err(e) => println!("{}", json!({ "error": e.to_string() })),
            }
        }
        OutputFormat::Text => {
            println!("{}", view.summary);
            println!();

            println!("Generated SQL:");
            println!("{}", view.generated_sql);
            println!();

            let kpis = &view.kpis;
            println!("Profiles: {}   Floats: {}", kpis.profile_count, kpis.float_count);
            if let Some(avg) = kpis.average_value {
                println!("Average:  {:.2} {}", avg, kpis.unit);
            }
            if let Some(depth) = kpis.max_depth_m {
                println!("Max depth: {:.0} m", depth);
            }

            if !view.depth_series.is_empty() {
                println!();
                println!("Representative profile ({}):", kpis.unit);
                for m in &view.depth_series {
                    println!("  {:>6.0} m  {:>8.2}", m.depth_m, m.value);
                }
            }

            if let Some(last) = view.timeline.last() {
                println!();
                println!(
                    "Discovery timeline: {} points, {} profiles by {}",
                    view.timeline.len(),
                    last.cumulative,
                    last.day
                );
            }

            if !view.rows.is_empty() {
                println!();
                println!("Matching profiles (first 10):");
                for row in view.rows.iter().take(10) {
                    println!(
                        "  WMO {}  {:>7.2}°  {:>8.2}°  {}",
                        row.wmo_id,
                        row.latitude,
                        row.longitude,
                        row.timestamp.format("%Y-%m-%d %H:%MZ")
                    );
                }
            }
        }
    }
}
