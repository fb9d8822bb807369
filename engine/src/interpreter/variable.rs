//! Variable qualifier extraction
//!
//! Maps measurement wording ("salinity", "psu", "temp", "dbar") onto the
//! [`Variable`] enum. When several variables are named the one mentioned
//! first wins; variables are not mutually exclusive the way regions and time
//! windows are, so this never reports ambiguity.

use regex::Regex;
use sdk::types::Variable;

pub struct VariableRule {
    patterns: Vec<(Regex, Variable)>,
}

impl VariableRule {
    pub fn new() -> anyhow::Result<Self> {
        let patterns = vec![
            (Regex::new(r"\b(?:salinit(?:y|ies)|psu|salt)\b")?, Variable::Salinity),
            (
                Regex::new(r"\b(?:temperatures?|temp|celsius|thermal)\b")?,
                Variable::Temperature,
            ),
            (Regex::new(r"\b(?:pressures?|dbar)\b")?, Variable::Pressure),
        ];

        Ok(Self { patterns })
    }

    /// Extract the first-mentioned variable from `text` (already lowercased).
    pub fn extract(&self, text: &str) -> Option<Variable> {
        self.patterns
            .iter()
            .filter_map(|(pattern, variable)| {
                pattern.find(text).map(|m| (m.start(), *variable))
            })
            .min_by_key(|(position, _)| *position)
            .map(|(_, variable)| variable)
    }
}
