//! Property-based tests for the rule engine and catalogs
//!
//! These tests verify that rule sets behave correctly across a wide range
//! of generated inputs.

use perkos_validators::catalog::{self, ai, payment};
use perkos_validators::ViolationCode;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-zA-Z0-9 :x.]{0,50}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                proptest::collection::hash_map("[a-zA-Z_][a-zA-Z0-9_]{0,20}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for generating well-formed Ethereum addresses
fn address_strategy() -> impl Strategy<Value = String> {
    "[a-fA-F0-9]{40}".prop_map(|digits| format!("0x{}", digits))
}

/// Strategy for generating accepted image-generate requests
fn image_request_strategy() -> impl Strategy<Value = Value> {
    (
        "[a-zA-Z0-9 ,.]{1,100}", // prompt
        proptest::option::of(prop_oneof![Just("1024x1024"), Just("1792x1024"), Just("1024x1792")]),
        proptest::option::of(prop_oneof![Just("standard"), Just("hd")]),
        proptest::option::of(prop_oneof![Just("vivid"), Just("natural")]),
        proptest::option::of(1u8..=10),
    )
        .prop_map(|(prompt, size, quality, style, n)| {
            let mut request = json!({ "prompt": prompt });
            if let Some(size) = size {
                request["size"] = json!(size);
            }
            if let Some(quality) = quality {
                request["quality"] = json!(quality);
            }
            if let Some(style) = style {
                request["style"] = json!(style);
            }
            if let Some(n) = n {
                request["n"] = json!(n);
            }
            request
        })
}

proptest! {
    /// Property: No rule set panics on any JSON input, and the two entry points agree
    #[test]
    fn prop_rule_sets_never_panic(input in json_value_strategy()) {
        for rule_set in catalog::all() {
            let strict = rule_set.validate(&input);
            let safe = rule_set.safe_validate(&input);
            prop_assert_eq!(strict.is_ok(), safe.ok());
        }
    }

    /// Property: Rejections always carry at least one violation
    #[test]
    fn prop_rejections_are_explained(input in json_value_strategy()) {
        for rule_set in catalog::all() {
            if let Err(error) = rule_set.validate(&input) {
                prop_assert!(!error.is_empty(), "{} rejected without violations", rule_set.name());
            }
        }
    }

    /// Property: Well-formed addresses are always accepted, unchanged
    #[test]
    fn prop_well_formed_addresses_accepted(address in address_strategy()) {
        let value = payment::ethereum_address().validate(&json!(address)).unwrap();
        prop_assert_eq!(value, json!(address));
    }

    /// Property: Addresses of the wrong length are always pattern mismatches
    #[test]
    fn prop_wrong_length_addresses_rejected(digits in "[a-f0-9]{0,80}") {
        prop_assume!(digits.len() != 40);
        let error = payment::ethereum_address()
            .validate(&json!(format!("0x{}", digits)))
            .unwrap_err();
        prop_assert_eq!(error.violations[0].code, ViolationCode::PatternMismatch);
    }

    /// Property: Valid image-generate requests are idempotent under validation
    #[test]
    fn prop_image_generate_idempotent(request in image_request_strategy()) {
        let once = ai::image_generate().validate(&request).unwrap();
        let twice = ai::image_generate().validate(&once).unwrap();
        prop_assert_eq!(&once, &twice);

        for key in ["prompt", "size", "quality", "style", "n"] {
            prop_assert!(once.get(key).is_some(), "missing {}", key);
        }
    }

    /// Property: Decimal price strings are accepted, anything with letters is not
    #[test]
    fn prop_price_strings(whole in 0u32..1_000_000, fraction in proptest::option::of(0u32..10_000), junk in "[a-z]{1,5}") {
        let text = match fraction {
            Some(fraction) => format!("{}.{}", whole, fraction),
            None => whole.to_string(),
        };
        prop_assert!(payment::price().validate(&json!(text)).is_ok());
        let with_junk = format!("{}{}", text, junk);
        prop_assert!(payment::price().validate(&json!(with_junk)).is_err());
    }

    /// Property: Unknown keys never survive normalization
    #[test]
    fn prop_unknown_keys_dropped(key in "zz[a-z]{1,10}", value in json_value_strategy()) {
        let mut request = json!({"prompt": "a cat"});
        request[key.as_str()] = value;
        let normalized = ai::image_generate().validate(&request).unwrap();
        prop_assert!(normalized.get(&key).is_none());
    }
}
