//! PerkOS Validators - declarative input validation for AI and x402 payments
//!
//! This crate holds the shared rule sets that AI feature endpoints and the
//! x402 payment facilitator run incoming JSON through:
//! - **AI catalog**: request bodies of the image, audio, text, content, code
//!   and education endpoints
//! - **Payment catalog**: networks, addresses, hashes, prices, signed payment
//!   envelopes, settlement requests and error responses
//!
//! ## Features
//!
//! - **Declarative Rules**: text, number, enumeration, list, object, record
//!   and union rules built with small builders
//! - **Normalization**: accepted values come back with defaults filled in and
//!   unknown keys dropped
//! - **Complete Reporting**: every violation is collected, each with a path,
//!   a message and a machine-readable code
//! - **Strict and Safe Entry Points**: fail with an error, or get a tagged
//!   ok/failed record
//! - **Typed Inputs**: every object rule set has a serde struct that parses
//!   the normalized value
//! - **Batch Processing**: one rule set over many documents, with fail-fast
//!   and error caps
//!
//! ## Quick Start
//!
//! ```rust
//! use perkos_validators::catalog::{ai, payment, Validated};
//! use perkos_validators::ViolationCode;
//! use serde_json::json;
//!
//! // Defaults are filled in
//! let value = ai::image_generate().validate(&json!({"prompt": "a cat"})).unwrap();
//! assert_eq!(value["size"], "1024x1024");
//!
//! // Violations carry path and code
//! let error = payment::ethereum_address().validate(&json!("0xabc")).unwrap_err();
//! assert_eq!(error.violations[0].code, ViolationCode::PatternMismatch);
//!
//! // Typed parsing goes through the same rules
//! let input = ai::QuizGenerateInput::parse(&json!({"topic": "rust"})).unwrap();
//! assert_eq!(input.question_count, 10);
//! ```
//!
//! ## Lookup by Name
//!
//! ```rust
//! use perkos_validators::catalog;
//! use serde_json::json;
//!
//! let rule_set = catalog::get("payment-header").unwrap();
//! let outcome = rule_set.safe_validate(&json!("Bearer abc"));
//! assert!(!outcome.ok());
//! ```
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

pub mod catalog;
pub mod error;
pub mod validation;

// Re-export commonly used types for convenience
pub use catalog::{Catalog, RuleSet, Validated};
pub use error::{Error, Result};
pub use validation::{
    format_violations, partial, required, safe_validate, validate, validate_batch,
    BatchReport, FormattedViolation, Outcome, Rule, SafeOutcome, ValidationConfig,
    ValidationError, Violation, ViolationCode,
};
