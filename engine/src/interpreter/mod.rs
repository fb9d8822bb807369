//! Query interpreter
//!
//! Turns a free-text oceanographic question into a [`Filter`]. The
//! interpreter is a set of independent extractor rules over the lowercased
//! question text — spatial, temporal, variable — merged with explicit
//! defaults rather than a monolithic grammar, so each rule stays testable on
//! its own.
//!
//! Recall is preferred over precision: wording the rules don't recognize is
//! ignored, and only a question with *no* recognizable qualifier at all is
//! rejected as unparsable. Given the same (text, now) pair the interpreter
//! always produces the same filter.

use crate::config::InterpreterConfig;
use crate::filter::Filter;
use chrono::{DateTime, Utc};
use sdk::errors::ExplorerError;
use sdk::types::Variable;
use tracing::debug;

mod spatial;
mod temporal;
mod variable;

pub use spatial::{SpatialBounds, SpatialRule};
pub use temporal::{TemporalRule, TimeWindow};
pub use variable::VariableRule;

/// Free-text question -> [`Filter`] translator.
pub struct Interpreter {
    spatial: SpatialRule,
    temporal: TemporalRule,
    variable: VariableRule,
    default_variable: Variable,
    default_limit: u32,
    default_window_days: i64,
}

impl Interpreter {
    /// Build an interpreter from the configured defaults.
    pub fn new(config: &InterpreterConfig) -> anyhow::Result<Self> {
        let default_variable = Variable::parse(&config.default_variable).ok_or_else(|| {
            anyhow::anyhow!("invalid default variable: {}", config.default_variable)
        })?;

        Ok(Self {
            spatial: SpatialRule::new(config.equator_band_degrees)?,
            temporal: TemporalRule::new()?,
            variable: VariableRule::new()?,
            default_variable,
            default_limit: config.default_limit,
            default_window_days: config.default_window_days,
        })
    }

    /// Interpret a question against the caller-supplied "now".
    ///
    /// Fails with `UnparsableQuery` when no spatial, temporal, or variable
    /// token is recognized, and with `AmbiguousQuery` when two mutually
    /// exclusive spatial or temporal clauses are present. Missing dimensions
    /// fall back to the configured defaults: the whole globe, the trailing
    /// default window, and the default variable.
    pub fn interpret(&self, text: &str, now: DateTime<Utc>) -> Result<Filter, ExplorerError> {
        let lowered = text.to_lowercase();

        let spatial = self.spatial.extract(&lowered)?;
        let temporal = self.temporal.extract(&lowered, now)?;
        let variable = self.variable.extract(&lowered);

        if spatial.is_none() && temporal.is_none() && variable.is_none() {
            return Err(ExplorerError::UnparsableQuery(truncate(text.trim(), 80)));
        }

        let bounds = spatial.unwrap_or(SpatialBounds {
            lat_min: -90.0,
            lat_max: 90.0,
            lon_min: None,
            lon_max: None,
        });

        let window = temporal.unwrap_or(TimeWindow {
            start: now - chrono::Duration::days(self.default_window_days),
            end: now,
        });

        let variable = variable.unwrap_or(self.default_variable);

        debug!(
            lat_min = bounds.lat_min,
            lat_max = bounds.lat_max,
            start = %window.start,
            end = %window.end,
            variable = %variable,
            "interpreted question"
        );

        Filter::new(
            bounds.lat_min,
            bounds.lat_max,
            bounds.lon_min,
            bounds.lon_max,
            window.start,
            window.end,
            variable,
            self.default_limit,
        )
        .map_err(|e| ExplorerError::UnparsableQuery(e.to_string()))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}
