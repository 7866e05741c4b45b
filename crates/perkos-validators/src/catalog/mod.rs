//! Named rule sets for AI endpoints and x402 payments
//!
//! Each rule set is built once on first use and lives for the rest of the
//! process. Rule sets are reachable through their typed accessor
//! (`ai::image_generate()`) or by name through [`lookup`].
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::validation::{
    self, ObjectRule, Rule, SafeOutcome, ValidationError, Violation, ViolationCode,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Declare a lazily built, process-wide rule set accessor
macro_rules! rule_set {
    ($(#[$meta:meta])* $vis:vis fn $accessor:ident => $name:literal, $catalog:expr, $build:expr) => {
        $(#[$meta])*
        $vis fn $accessor() -> &'static $crate::catalog::RuleSet {
            static RULE_SET: std::sync::OnceLock<$crate::catalog::RuleSet> = std::sync::OnceLock::new();
            RULE_SET.get_or_init(|| $crate::catalog::RuleSet::new($name, $catalog, $build))
        }
    };
}

/// Bind a typed input to the rule set that produces it
macro_rules! impl_validated {
    ($($ty:ty => $accessor:path),+ $(,)?) => {
        $(
            impl $crate::catalog::Validated for $ty {
                fn rule_set() -> &'static $crate::catalog::RuleSet {
                    $accessor()
                }
            }
        )+
    };
}

pub mod ai;
pub mod payment;

/// Family a rule set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    /// AI feature request payloads
    Ai,
    /// x402 payment protocol values
    Payment,
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ai => f.write_str("ai"),
            Self::Payment => f.write_str("payment"),
        }
    }
}

/// A named, immutable rule set
#[derive(Debug)]
pub struct RuleSet {
    name: &'static str,
    catalog: Catalog,
    rule: Rule,
}

impl RuleSet {
    pub fn new<R: Into<Rule>>(name: &'static str, catalog: Catalog, rule: R) -> Self {
        Self {
            name,
            catalog,
            rule: rule.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Field table, for rule sets that validate objects
    pub fn object(&self) -> Result<&ObjectRule> {
        self.rule
            .as_object()
            .ok_or(Error::NotAnObject { rule_set: self.name })
    }

    /// Strict entry point: the normalized value, or every violation
    pub fn validate(&self, value: &Value) -> std::result::Result<Value, ValidationError> {
        match validation::validate(&self.rule, value) {
            Ok(normalized) => {
                tracing::debug!(rule_set = self.name, "Value accepted");
                Ok(normalized)
            }
            Err(error) => {
                tracing::debug!(
                    rule_set = self.name,
                    violations = error.len(),
                    "Value rejected"
                );
                for violation in &error.violations {
                    tracing::trace!(
                        rule_set = self.name,
                        path = %violation.path,
                        code = %violation.code,
                        "{}",
                        violation.message
                    );
                }
                Err(error.with_rule_set(self.name))
            }
        }
    }

    /// Safe entry point: never fails, the outcome says whether it passed
    pub fn safe_validate(&self, value: &Value) -> SafeOutcome {
        let outcome = validation::safe_validate(&self.rule, value);
        tracing::debug!(
            rule_set = self.name,
            ok = outcome.ok(),
            violations = outcome.violations().len(),
            "Safe validation finished"
        );
        outcome
    }

    /// This rule set with every field optional
    pub fn partial(&self) -> Result<ObjectRule> {
        Ok(validation::partial(self.object()?))
    }

    /// This rule set with every field required
    pub fn required(&self) -> Result<ObjectRule> {
        Ok(validation::required(self.object()?))
    }
}

/// Typed form of a rule set's accepted values
///
/// Parsing validates first, so the typed value always reflects the
/// normalized output, defaults included.
pub trait Validated: DeserializeOwned {
    fn rule_set() -> &'static RuleSet;

    fn parse(value: &Value) -> Result<Self> {
        let rule_set = Self::rule_set();
        let normalized = rule_set.validate(value)?;
        serde_json::from_value(normalized).map_err(|source| Error::Deserialize {
            rule_set: rule_set.name(),
            source,
        })
    }

    /// Like [`Validated::parse`], but a rejection comes back as the
    /// violation list. A value that passes the rules yet does not fit the
    /// typed form is reported as one root `invalid-type` violation.
    fn safe_parse(value: &Value) -> std::result::Result<Self, Vec<Violation>> {
        match Self::parse(value) {
            Ok(parsed) => Ok(parsed),
            Err(Error::Validation(error)) => Err(error.into_violations()),
            Err(error) => Err(vec![Violation::new(
                "",
                error.to_string(),
                ViolationCode::InvalidType,
            )]),
        }
    }
}

/// Every registered rule set, AI catalog first
pub fn all() -> Vec<&'static RuleSet> {
    let mut rule_sets = ai::all();
    rule_sets.extend(payment::all());
    rule_sets
}

/// Rule sets of one catalog
pub fn by_catalog(catalog: Catalog) -> Vec<&'static RuleSet> {
    match catalog {
        Catalog::Ai => ai::all(),
        Catalog::Payment => payment::all(),
    }
}

/// Find a rule set by its kebab-case name
pub fn lookup(name: &str) -> Option<&'static RuleSet> {
    all().into_iter().find(|rule_set| rule_set.name() == name)
}

/// Like [`lookup`], failing with [`Error::UnknownRuleSet`]
pub fn get(name: &str) -> Result<&'static RuleSet> {
    lookup(name).ok_or_else(|| Error::UnknownRuleSet {
        name: name.to_string(),
    })
}
