//! Rule vocabulary, engine and the generic validation utilities
//!
//! Every catalog rule set is expressed with the types in [`rule`] and applied
//! by one recursive engine. The functions here are the catalog-agnostic entry
//! points:
//!
//! - **validate**: apply a rule, fail with every violation found
//! - **safe_validate**: apply a rule, return a tagged ok/failed record
//! - **partial / required**: derive relaxed or tightened object rules
//! - **format_violations**: flatten violations for an API error body
//! - **validate_batch**: apply one rule to many documents
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod engine;
pub mod error;
pub mod rule;

pub use base::{Outcome, SafeOutcome, ValidationContext};
pub use error::{FormattedViolation, ValidationError, Violation, ViolationCode};
pub use rule::{Bound, EnumRule, Field, NumberRule, ObjectRule, Pattern, Presence, Rule, TextRule};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Apply `rule` to `value`, returning the normalized value or every violation
///
/// # Examples
///
/// ```rust
/// use perkos_validators::validation::{validate, ObjectRule, TextRule, Rule};
/// use serde_json::json;
///
/// let rule = Rule::from(ObjectRule::new().required("prompt", TextRule::new().non_empty("Prompt is required")));
/// assert!(validate(&rule, &json!({"prompt": "a cat"})).is_ok());
/// assert!(validate(&rule, &json!({"prompt": ""})).is_err());
/// ```
pub fn validate(rule: &Rule, value: &Value) -> Result<Value, ValidationError> {
    engine::apply(rule, value).into_result()
}

/// Apply `rule` to `value` without failing; the outcome carries the result
pub fn safe_validate(rule: &Rule, value: &Value) -> SafeOutcome {
    engine::apply(rule, value).into()
}

/// Relax every field of `rule` to optional, keeping defaults
pub fn partial(rule: &ObjectRule) -> ObjectRule {
    rule.partial()
}

/// Make every field of `rule` mandatory
pub fn required(rule: &ObjectRule) -> ObjectRule {
    rule.to_required()
}

/// Flatten violations into `{path, message, code}` records, preserving order
pub fn format_violations(violations: &[Violation]) -> Vec<FormattedViolation> {
    violations.iter().map(FormattedViolation::from).collect()
}

/// Validation configuration for batch operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Whether to stop on the first rejected document or keep going
    pub fail_fast: bool,
    /// Maximum number of rejected documents to collect (0 = unlimited)
    pub max_errors: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl ValidationConfig {
    /// Validate every document and collect every rejection
    pub fn strict() -> Self {
        Self {
            fail_fast: false,
            max_errors: 0,
        }
    }

    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of rejected documents to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// Outcome of one document inside a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    pub index: usize,
    pub outcome: SafeOutcome,
}

/// Result of validating many documents against one rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Number of documents submitted
    pub total: usize,
    /// Per-document outcomes, in input order, for the documents processed
    pub items: Vec<BatchItem>,
    /// Whether processing stopped before the last document
    pub stopped_early: bool,
}

impl BatchReport {
    pub fn accepted(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.ok()).count()
    }

    pub fn rejected(&self) -> usize {
        self.items.len() - self.accepted()
    }

    /// True when every submitted document was processed and accepted
    pub fn is_success(&self) -> bool {
        !self.stopped_early && self.rejected() == 0
    }

    /// All violations with the document index prefixed to each path
    pub fn violations(&self) -> Vec<Violation> {
        self.items
            .iter()
            .flat_map(|item| {
                let ctx = ValidationContext::root().child_index(item.index);
                item.outcome.violations().iter().map(move |violation| {
                    let path = if violation.path.is_empty() {
                        ctx.path.clone()
                    } else {
                        ctx.child(&violation.path).path
                    };
                    Violation::new(path, violation.message.clone(), violation.code)
                })
            })
            .collect()
    }
}

/// Batch validation of many documents against one rule
pub fn validate_batch(rule: &Rule, documents: &[Value], config: &ValidationConfig) -> BatchReport {
    let mut items = Vec::with_capacity(documents.len());
    let mut rejected = 0;

    for (index, document) in documents.iter().enumerate() {
        let outcome = safe_validate(rule, document);
        let failed = !outcome.ok();
        items.push(BatchItem { index, outcome });

        if failed {
            rejected += 1;

            if config.fail_fast {
                break;
            }

            if config.max_errors > 0 && rejected >= config.max_errors {
                break;
            }
        }
    }

    let report = BatchReport {
        total: documents.len(),
        stopped_early: items.len() < documents.len(),
        items,
    };

    tracing::info!(
        total = report.total,
        processed = report.items.len(),
        rejected = report.rejected(),
        stopped_early = report.stopped_early,
        "Batch validation finished"
    );

    report
}
