//! Crate-level error type
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

use crate::validation::ValidationError;
use thiserror::Error;

/// Result alias for operations that can fail outside of plain validation
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The value broke one or more rules
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An accepted value could not be converted into its typed form
    #[error("Accepted value for '{rule_set}' does not fit its typed form: {source}")]
    Deserialize {
        rule_set: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// No rule set is registered under the name
    #[error("Unknown rule set '{name}'")]
    UnknownRuleSet { name: String },

    /// The rule set validates a primitive, so field transforms do not apply
    #[error("Rule set '{rule_set}' is not an object rule set")]
    NotAnObject { rule_set: &'static str },
}

impl Error {
    /// Violations carried by a validation failure, empty otherwise
    pub fn violations(&self) -> &[crate::validation::Violation] {
        match self {
            Self::Validation(error) => &error.violations,
            _ => &[],
        }
    }
}
