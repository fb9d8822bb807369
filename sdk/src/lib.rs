//! Argonaut SDK
//!
//! Shared library providing the domain types, the profile store trait, and
//! the error taxonomy used by the explorer engine. This crate is the only
//! vocabulary that crosses the boundary between the engine and external
//! collaborators (profile stores, presentation layers).

/// Error types and handling
pub mod errors;

/// Profile store trait
pub mod store;

/// Domain value types
pub mod types;

// Re-export commonly used types
pub use errors::{ExplorerError, ExplorerErrorExt};
pub use store::{ProfileStore, StoreError};
pub use types::{Measurement, PlannedQuery, Profile, Variable};
