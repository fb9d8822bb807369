//! CLI interface for Argonaut
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags for the explorer binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Argonaut ARGO Data Explorer
///
/// A conversational explorer for ARGO float profiles: ask a question about a
/// region, time window, and variable, and get back summary statistics, a
/// representative depth curve, a discovery timeline, and matching floats.
#[derive(Parser, Debug)]
#[command(name = "argonaut")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask one question and render the answer
    Ask {
        /// The question, e.g. "salinity near the equator in March 2023"
        question: String,
    },

    /// Load the bundled demo dataset into the profile store
    Seed,

    /// Show profile store status
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Create a default configuration file if none exists
    Init,
}
