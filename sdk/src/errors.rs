//! Error types and handling
//!
//! This module provides the error types used throughout the explorer engine.
//! All errors implement the `ExplorerErrorExt` trait which provides
//! user-friendly hints and indicates whether errors are recoverable.
//!
//! Every failure in the pipeline surfaces to the user as a single
//! assistant-role conversation turn; the messages here are what those turns
//! carry, so they must be safe and meaningful to display as-is.

use thiserror::Error;

/// Trait for explorer error extensions
///
/// Provides additional context for errors: a user-friendly hint suitable for
/// a chat transcript, and recoverability information so callers know whether
/// re-prompting or retrying makes sense.
pub trait ExplorerErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to end users and does not contain file
    /// paths, connection strings, or internal implementation details.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or worked around by rephrasing the
    /// question or waiting. Non-recoverable errors typically require fixing
    /// configuration or the profile store.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// Represents all failures the question-answering pipeline can produce.
/// Note what is deliberately *not* here: a query matching zero profiles is a
/// valid empty result, not an error.
///
/// # Error Categories
///
/// - **Interpreter**: the question could not be turned into a filter
/// - **Store**: the profile store could not be reached or timed out
/// - **Session**: a submission arrived while another was in flight
/// - **Configuration / Database**: engine plumbing failures
#[derive(Debug, Error)]
pub enum ExplorerError {
    // Interpreter errors
    #[error("Could not understand the question: {0}")]
    UnparsableQuery(String),

    #[error("Ambiguous question: {0}")]
    AmbiguousQuery(String),

    // Profile store errors
    #[error("Profile store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Profile store timed out")]
    StoreTimeout,

    // Session errors
    #[error("A question is already being answered")]
    SessionBusy,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExplorerErrorExt for ExplorerError {
    fn user_hint(&self) -> &str {
        match self {
            // Interpreter errors
            Self::UnparsableQuery(_) => {
                "I couldn't find a region, time window, or variable in that question. \
                 Try something like \"salinity near the equator in March 2023\""
            }
            Self::AmbiguousQuery(_) => {
                "That question asks for two things at once. Try narrowing it to a \
                 single region and time window"
            }

            // Profile store errors
            Self::StoreUnavailable(_) => {
                "The profile store could not be reached. Please try again shortly"
            }
            Self::StoreTimeout => "The profile store took too long to respond. Try again",

            // Session errors
            Self::SessionBusy => {
                "I'm still working on the previous question. Wait for it to finish or cancel it"
            }

            // Configuration errors
            Self::Config(_) => "Check your config.toml file for errors",

            // Database errors
            Self::Database(_) => "Database operation failed. Check the store path and try again",

            // Generic IO error
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Configuration problems need manual intervention
            Self::Config(_) => false,

            // Everything else can be retried or rephrased
            _ => true,
        }
    }
}
