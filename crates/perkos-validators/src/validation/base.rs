//! Validation context and outcome types
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::{FormattedViolation, ValidationError, Violation, ViolationCode};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Position of the value currently being validated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    /// Dot-joined path from the root; empty at the root
    pub path: String,
}

impl ValidationContext {
    /// Context positioned at the root value
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a child context for an object key
    pub fn child<P: AsRef<str>>(&self, segment: P) -> Self {
        let path = if self.path.is_empty() {
            segment.as_ref().to_string()
        } else {
            format!("{}.{}", self.path, segment.as_ref())
        };
        Self { path }
    }

    /// Create a child context for an array index
    pub fn child_index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    /// Build a violation located at this context
    pub fn violation<M: Into<String>>(&self, code: ViolationCode, message: M) -> Violation {
        Violation::new(self.path.clone(), message, code)
    }
}

/// Result of applying a rule to a value
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Normalized value: defaults filled in, numbers canonicalized, unknown keys stripped
    Accepted(Value),
    /// Every violation found, in discovery order
    Rejected(Vec<Violation>),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn into_result(self) -> Result<Value, ValidationError> {
        match self {
            Self::Accepted(value) => Ok(value),
            Self::Rejected(violations) => Err(ValidationError::new(violations)),
        }
    }
}

/// Tagged success/failure record returned by safe validation
///
/// Serializes as `{"ok": true, "value": ...}` or
/// `{"ok": false, "violations": [{"path", "message", "code"}, ...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum SafeOutcome {
    Ok { value: Value },
    Failed { violations: Vec<Violation> },
}

impl SafeOutcome {
    pub fn ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Ok { value } => Some(value),
            Self::Failed { .. } => None,
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Ok { .. } => &[],
            Self::Failed { violations } => violations,
        }
    }
}

impl From<Outcome> for SafeOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Accepted(value) => Self::Ok { value },
            Outcome::Rejected(violations) => Self::Failed { violations },
        }
    }
}

impl Serialize for SafeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SafeOutcome", 2)?;
        match self {
            Self::Ok { value } => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
            }
            Self::Failed { violations } => {
                let formatted: Vec<FormattedViolation> =
                    violations.iter().map(FormattedViolation::from).collect();
                state.serialize_field("ok", &false)?;
                state.serialize_field("violations", &formatted)?;
            }
        }
        state.end()
    }
}
