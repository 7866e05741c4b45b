//! Batch command handler

use super::utils::{load_document, resolve_rule_set};
use crate::cli::BatchArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use perkos_validators::validate_batch;
use serde_json::Value;
use tracing::{info, instrument};

/// Handle the batch command
#[instrument(skip(config, output), fields(rule_set = %args.rule_set, file = %args.file.display()))]
pub fn handle_batch(args: BatchArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("batch_command", &format!("file: {}", args.file.display()));

    let rule_set = resolve_rule_set(&args.rule_set)?;
    let documents = match load_document(&args.file)? {
        Value::Array(documents) => documents,
        _ => {
            return Err(Error::InvalidFormat {
                path: args.file.clone(),
                expected: "array of documents".to_string(),
            })
        }
    };
    output.info(&format!(
        "Checking {} document(s) against '{}'",
        documents.len(),
        rule_set.name()
    ))?;

    // Flags override the config file
    let mut settings = config.validation.clone();
    if args.fail_fast {
        settings = settings.with_fail_fast();
    }
    if let Some(max_errors) = args.max_errors {
        settings = settings.with_max_errors(max_errors);
    }
    info!(fail_fast = settings.fail_fast, max_errors = settings.max_errors, "Batch settings");

    let report = validate_batch(rule_set.rule(), &documents, &settings);
    output.batch_report(rule_set.name(), &report)?;

    if report.is_success() {
        Ok(())
    } else {
        Err(Error::Rejected {
            rule_set: rule_set.name().to_string(),
            rejected: report.rejected(),
            total: report.total,
        })
    }
}
