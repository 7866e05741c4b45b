//! Check command handler

use super::utils::{load_document, resolve_rule_set};
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use perkos_validators::{safe_validate, Rule, SafeOutcome};
use tracing::{info, instrument, warn};

/// Handle the check command
#[instrument(skip(config, output), fields(rule_set = %args.rule_set, file = %args.file.display()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("check_command", &format!("file: {}", args.file.display()));

    let rule_set = resolve_rule_set(&args.rule_set)?;
    output.info(&format!(
        "Checking {} against '{}'",
        args.file.display(),
        rule_set.name()
    ))?;

    let document = load_document(&args.file)?;

    let derived = if args.partial {
        Some(Rule::from(rule_set.partial()?))
    } else if args.all_required {
        Some(Rule::from(rule_set.required()?))
    } else {
        None
    };

    let outcome = {
        let _validation_timer = Timer::new("rule_validation");
        match &derived {
            Some(rule) => safe_validate(rule, &document),
            None => rule_set.safe_validate(&document),
        }
    };

    match &outcome {
        SafeOutcome::Ok { value } => {
            info!("Document accepted");
            if output.is_human() {
                output.success(&format!("✓ Document satisfies '{}'", rule_set.name()))?;
                if args.show_value || config.output.show_value {
                    output.section("Normalized Value")?;
                    output.data(value)?;
                }
            } else {
                output.data(&outcome)?;
            }
            Ok(())
        }
        SafeOutcome::Failed { violations } => {
            warn!(violations = violations.len(), format = ?output.format(), "Document rejected");
            output.violations(rule_set.name(), violations)?;
            Err(Error::Rejected {
                rule_set: rule_set.name().to_string(),
                rejected: 1,
                total: 1,
            })
        }
    }
}
