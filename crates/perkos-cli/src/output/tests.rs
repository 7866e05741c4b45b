// Tests for output formatting
//
// These tests verify violation and batch rendering in every output format,
// and that the writer honors quiet mode and redaction.

use super::*;
use perkos_validators::catalog::{ai, payment};
use perkos_validators::{validate_batch, ValidationConfig, ViolationCode};
use serde_json::json;
use super::capture::writer;

fn translate_violations() -> Vec<Violation> {
    ai::text_translate()
        .validate(&json!({"text": "", "sourceLang": 1, "targetLang": "en"}))
        .unwrap_err()
        .into_violations()
}

#[test]
fn test_violations_formatting_human() {
    let formatted = format_violations_human("text-translate", &translate_violations());
    assert!(formatted.contains("❌ 'text-translate' rejected the document with 2 violation(s)"));
    assert!(formatted.contains("1. 📍 text [missing-required] Text is required"));
    assert!(formatted.contains("2. 📍 sourceLang [invalid-type] Expected string, received number"));
}

#[test]
fn test_root_path_is_labelled() {
    let violations = payment::ethereum_address()
        .validate(&json!("0xabc"))
        .unwrap_err()
        .into_violations();
    let formatted = format_violations_human("ethereum-address", &violations);
    assert!(formatted.contains("📍 (root) [pattern-mismatch] Invalid Ethereum address"));
}

#[test]
fn test_violations_formatting_json() {
    let formatted = OutputFormat::Json
        .format_violations("text-translate", &translate_violations())
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();
    assert_eq!(value["rule_set"], "text-translate");
    assert_eq!(value["ok"], false);
    assert_eq!(value["violations"][0]["path"], "text");
    assert_eq!(value["violations"][0]["code"], "missing-required");
    assert_eq!(value["violations"][1]["path"], "sourceLang");
}

#[test]
fn test_violations_formatting_yaml() {
    let formatted = OutputFormat::Yaml
        .format_violations("text-translate", &translate_violations())
        .unwrap();
    assert!(formatted.contains("rule_set: text-translate"));
    assert!(formatted.contains("code: missing-required"));
}

#[test]
fn test_batch_report_formatting() {
    let documents = vec![json!("x402 a"), json!("bad"), json!("x402 b")];
    let report = validate_batch(
        payment::payment_header().rule(),
        &documents,
        &ValidationConfig::default(),
    );

    let human = format_batch_report_human("payment-header", &report);
    assert!(human.contains("═══ Batch 'payment-header' ═══"));
    assert!(human.contains("Processed: 3 of 3"));
    assert!(human.contains("✅ Accepted: 2"));
    assert!(human.contains("❌ Rejected: 1"));
    assert!(human.contains("📍 1 [pattern-mismatch] Payment header must start with 'x402'"));
    assert!(!human.contains("Stopped early"));

    let json = OutputFormat::Json
        .format_batch_report("payment-header", &report)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["accepted"], 2);
    assert_eq!(value["rejected"], 1);
    assert_eq!(value["total"], 3);
    assert_eq!(value["stopped_early"], false);
    assert_eq!(value["items"][1]["outcome"]["ok"], false);
    assert_eq!(
        value["items"][1]["outcome"]["violations"][0]["code"],
        ViolationCode::PatternMismatch.as_str()
    );
}

#[test]
fn test_output_formatter_trait() {
    let value = json!({"name": "payment-envelope"});
    assert_eq!(
        OutputFormat::Json.format(&value).unwrap(),
        r#"{"name":"payment-envelope"}"#
    );
    assert!(OutputFormat::JsonPretty.format(&value).unwrap().contains('\n'));
    assert_eq!(
        OutputFormat::Yaml.format(&value).unwrap(),
        "name: payment-envelope\n"
    );
}

#[test]
fn test_data_is_redacted() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output
        .data(&json!({"privateKey": "0x59c6995e998f97a5", "nonce": "0x01"}))
        .unwrap();
    let written = buffer.contents();
    assert!(written.contains(r#""privateKey":"***""#));
    assert!(written.contains(r#""nonce":"0x01""#));
}

#[test]
fn test_quiet_mode_suppresses_messages() {
    let (mut output, buffer) = writer(OutputFormat::Human, true);
    output.success("✓ accepted").unwrap();
    output.section("Value").unwrap();
    output.table(&["Name"], vec![vec!["network".to_string()]]).unwrap();
    assert_eq!(buffer.contents(), "");

    // Violations are the command's result, so quiet mode still prints them
    let violation = Violation::new("", "Invalid Ethereum address", ViolationCode::PatternMismatch);
    output.violations("ethereum-address", &[violation]).unwrap();
    assert!(buffer.contents().contains("📍 (root) [pattern-mismatch]"));
}

#[test]
fn test_machine_formats_skip_messages() {
    let (mut output, buffer) = writer(OutputFormat::Json, false);
    output.success("✓ accepted").unwrap();
    output.section("Value").unwrap();
    output.info("hello").unwrap();
    assert_eq!(buffer.contents(), "");
}

#[test]
fn test_table_layout() {
    let (mut output, buffer) = writer(OutputFormat::Human, false);
    output
        .table(
            &["Name", "Catalog"],
            vec![
                vec!["network".to_string(), "payment".to_string()],
                vec!["api-docs".to_string(), "ai".to_string()],
            ],
        )
        .unwrap();
    let lines: Vec<String> = buffer.contents().lines().map(str::to_string).collect();
    assert_eq!(lines[0], "Name     │ Catalog");
    assert_eq!(lines[1], format!("{}┼{}", "─".repeat(9), "─".repeat(8)));
    assert_eq!(lines[2], "network  │ payment");
    assert_eq!(lines[3], "api-docs │ ai");
}
