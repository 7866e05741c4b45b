//! Shared utilities for command handlers

use crate::error::{Error, Result};
use perkos_validators::{catalog, RuleSet};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Resolve a rule set by its kebab-case name
pub fn resolve_rule_set(name: &str) -> Result<&'static RuleSet> {
    let rule_set = catalog::get(name)?;
    debug!(rule_set = name, catalog = %rule_set.catalog(), "Rule set resolved");
    Ok(rule_set)
}

/// Load a JSON or YAML document, choosing the parser by extension
pub fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    debug!("Document read, {} bytes", content.len());

    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|_e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|_e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}
