//! List command handler

use crate::cli::ListArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use perkos_validators::catalog::{self, Catalog, RuleSet};
use perkos_validators::validation::{ObjectRule, Presence};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// One registered rule set
#[derive(Debug, Serialize)]
struct RuleSetEntry {
    name: &'static str,
    catalog: Catalog,
    kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldEntry>,
}

/// One field of an object rule set
#[derive(Debug, Serialize)]
struct FieldEntry {
    name: String,
    kind: &'static str,
    presence: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
}

impl RuleSetEntry {
    fn new(rule_set: &RuleSet, with_fields: bool) -> Self {
        let fields = match rule_set.rule().as_object() {
            Some(object) if with_fields => field_entries(object),
            _ => Vec::new(),
        };
        Self {
            name: rule_set.name(),
            catalog: rule_set.catalog(),
            kind: rule_set.rule().kind(),
            fields,
        }
    }
}

fn field_entries(object: &ObjectRule) -> Vec<FieldEntry> {
    object
        .fields()
        .iter()
        .map(|field| {
            let (presence, default) = match field.presence() {
                Presence::Required => ("required", None),
                Presence::Optional => ("optional", None),
                Presence::Defaulted(value) => ("defaulted", Some(value.clone())),
            };
            FieldEntry {
                name: field.name.clone(),
                kind: field.rule.kind(),
                presence,
                default,
            }
        })
        .collect()
}

/// Handle the list command
#[instrument(skip(output))]
pub fn handle_list(args: ListArgs, output: &mut OutputWriter) -> Result<()> {
    let rule_sets = match args.catalog {
        Some(catalog) => catalog::by_catalog(catalog.into()),
        None => catalog::all(),
    };
    debug!("Listing {} rule set(s)", rule_sets.len());

    if !output.is_human() {
        let entries: Vec<RuleSetEntry> = rule_sets
            .iter()
            .map(|rule_set| RuleSetEntry::new(rule_set, args.fields))
            .collect();
        return output.data(&entries);
    }

    let rows = rule_sets
        .iter()
        .map(|rule_set| {
            let required = rule_set
                .rule()
                .as_object()
                .map(|object| object.required_fields().collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            vec![
                rule_set.name().to_string(),
                rule_set.catalog().to_string(),
                rule_set.rule().kind().to_string(),
                required,
            ]
        })
        .collect();
    output.table(&["Name", "Catalog", "Kind", "Required fields"], rows)?;

    if args.fields {
        for rule_set in &rule_sets {
            let Some(object) = rule_set.rule().as_object() else {
                continue;
            };
            output.section(rule_set.name())?;
            let rows = field_entries(object)
                .into_iter()
                .map(|field| {
                    vec![
                        field.name,
                        field.kind.to_string(),
                        field.presence.to_string(),
                        field.default.map(|value| value.to_string()).unwrap_or_default(),
                    ]
                })
                .collect();
            output.table(&["Field", "Kind", "Presence", "Default"], rows)?;
        }
    }

    Ok(())
}
