//! Argonaut Engine Library
//!
//! This library provides the core functionality of the Argonaut ARGO data
//! explorer. It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Structured filter model shared by the pipeline stages
pub mod filter;

/// Natural-language question interpretation module
pub mod interpreter;

/// Query planning module
pub mod planner;

/// Result aggregation module
pub mod aggregate;

/// Visualization state building module
pub mod view;

/// Conversation session module
pub mod session;

/// Database persistence module
pub mod db;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
