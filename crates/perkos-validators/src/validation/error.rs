//! Violation and validation error types
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable classification of a failed constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationCode {
    /// A required field is absent, or a non-empty text field is empty
    MissingRequired,
    /// The value has the wrong JSON type
    InvalidType,
    /// The value is not one of the enumerated options
    InvalidEnumValue,
    /// The text does not match the expected pattern or URL shape
    PatternMismatch,
    /// A numeric bound or minimum length is not met
    OutOfRange,
    /// The text exceeds its maximum length
    TooLong,
}

impl ViolationCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequired => "missing-required",
            Self::InvalidType => "invalid-type",
            Self::InvalidEnumValue => "invalid-enum-value",
            Self::PatternMismatch => "pattern-mismatch",
            Self::OutOfRange => "out-of-range",
            Self::TooLong => "too-long",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level constraint failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dot-joined path from the root to the offending field (empty at the root)
    pub path: String,
    /// Human-readable explanation
    pub message: String,
    /// Kind of constraint that failed
    pub code: ViolationCode,
}

impl Violation {
    /// Create a violation
    pub fn new<P, M>(path: P, message: M, code: ViolationCode) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} ({})", self.message, self.code)
        } else {
            write!(f, "{}: {} ({})", self.path, self.message, self.code)
        }
    }
}

/// A violation flattened to plain strings, the shape an HTTP 4xx body carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedViolation {
    pub path: String,
    pub message: String,
    pub code: String,
}

impl From<&Violation> for FormattedViolation {
    fn from(violation: &Violation) -> Self {
        Self {
            path: violation.path.clone(),
            message: violation.message.clone(),
            code: violation.code.as_str().to_string(),
        }
    }
}

/// Failure of a strict validation, carrying every violation that was found
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub struct ValidationError {
    /// Name of the rule set that rejected the value, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_set: Option<String>,
    /// Violations in the order they were discovered
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule_set {
            Some(name) => write!(
                f,
                "Validation failed for '{}' with {} violation(s)",
                name,
                self.violations.len()
            )?,
            None => write!(f, "Validation failed with {} violation(s)", self.violations.len())?,
        }

        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }

        Ok(())
    }
}

impl ValidationError {
    /// Create a validation error from collected violations
    pub fn new(violations: Vec<Violation>) -> Self {
        Self {
            rule_set: None,
            violations,
        }
    }

    /// Attach the name of the rejecting rule set
    pub fn with_rule_set<N: Into<String>>(mut self, name: N) -> Self {
        self.rule_set = Some(name.into());
        self
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether no violation was recorded
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations carrying the given code
    pub fn with_code(&self, code: ViolationCode) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.code == code)
    }

    /// Flatten into API-ready records
    pub fn format(&self) -> Vec<FormattedViolation> {
        self.violations.iter().map(FormattedViolation::from).collect()
    }

    /// Consume the error, keeping only the violations
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl From<Vec<Violation>> for ValidationError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::new(violations)
    }
}
