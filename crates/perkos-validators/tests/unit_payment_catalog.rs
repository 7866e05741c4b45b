//! Unit tests for the x402 payment rule sets
//!
//! Covers the format primitives, the composite payloads that embed them and
//! the typed payment structures.

use perkos_validators::catalog::{payment, Validated};
use perkos_validators::{RuleSet, ViolationCode};
use serde_json::{json, Value};

fn address(digit: char) -> String {
    format!("0x{}", digit.to_string().repeat(40))
}

fn envelope() -> Value {
    json!({
        "payload": {
            "from": address('a'),
            "to": address('b'),
            "value": "10000",
            "validAfter": 0,
            "validBefore": 1735689600,
            "nonce": "0x7f3a",
            "network": "eip155:84532"
        },
        "signature": "0x1b2c3d4e5f"
    })
}

fn samples() -> Vec<(&'static RuleSet, Value)> {
    vec![
        (payment::network(), json!("base")),
        (payment::caip2_network(), json!("eip155:8453")),
        (payment::ethereum_address(), json!("0xAbCdEf0123456789aBcDeF0123456789AbCdEf01")),
        (payment::transaction_hash(), json!(format!("0x{}", "f".repeat(64)))),
        (payment::signature(), json!("0xdeadbeef")),
        (payment::price(), json!("0.01")),
        (payment::payment_envelope(), envelope()),
        (payment::payment_header(), json!("x402 eyJwYXlsb2FkIjp7fX0=")),
        (
            payment::payment_config(),
            json!({
                "recipientAddress": address('a'),
                "network": "base-sepolia",
                "tokenAddress": address('c'),
                "prices": {"/api/ai/image": "0.05", "/api/ai/text": 0.01}
            }),
        ),
        (
            payment::route_config(),
            json!({"path": "/api/ai/image", "price": "0.05", "description": "Image generation"}),
        ),
        (
            payment::payment_request(),
            json!({
                "amount": "1.00",
                "recipient": address('a'),
                "network": "celo",
                "memo": "order 17",
                "expiresAt": 1735689600
            }),
        ),
        (
            payment::payment_verification(),
            json!({
                "envelope": envelope(),
                "expectedAmount": "10000",
                "expectedRecipient": address('b'),
                "tolerance": 0.01
            }),
        ),
        (
            payment::token_info(),
            json!({"address": address('a'), "name": "USD Coin", "symbol": "USDC", "decimals": 6, "chainId": 8453}),
        ),
        (
            payment::eip712_domain(),
            json!({"name": "USD Coin", "version": "2", "chainId": 8453, "verifyingContract": address('a')}),
        ),
        (
            payment::settlement_request(),
            json!({"envelope": envelope(), "privateKey": "0x59c6995e998f97a5"}),
        ),
        (
            payment::settlement_result(),
            json!({"success": true, "transactionHash": format!("0x{}", "1".repeat(64)), "gasUsed": "52000"}),
        ),
        (
            payment::payment_error(),
            json!({"error": "Payment expired", "code": "EXPIRED_PAYMENT", "details": {"validBefore": 1}}),
        ),
    ]
}

#[cfg(test)]
mod valid_samples {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_rule_set_has_a_sample() {
        assert_eq!(samples().len(), payment::all().len());
    }

    #[test]
    fn test_samples_validate_to_themselves() {
        for (rule_set, sample) in samples() {
            let value = rule_set
                .validate(&sample)
                .unwrap_or_else(|e| panic!("{} rejected its sample: {}", rule_set.name(), e));
            assert_eq!(value, sample, "{}", rule_set.name());
            assert!(rule_set.safe_validate(&sample).ok());
        }
    }

    #[test]
    fn test_validation_is_idempotent() {
        for (rule_set, sample) in samples() {
            let once = rule_set.validate(&sample).unwrap();
            assert_eq!(rule_set.validate(&once).unwrap(), once, "{}", rule_set.name());
        }
    }

    #[test]
    fn test_tolerance_defaults_to_zero() {
        let value = payment::payment_verification()
            .validate(&json!({
                "envelope": envelope(),
                "expectedAmount": "10000",
                "expectedRecipient": address('b')
            }))
            .unwrap();
        assert_eq!(value["tolerance"], json!(0));
    }
}

#[cfg(test)]
mod required_fields {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removing_a_required_field_reports_it() {
        for (rule_set, sample) in samples() {
            let Ok(object) = rule_set.object() else {
                continue;
            };
            for field in object.required_fields() {
                let mut broken = sample.clone();
                broken.as_object_mut().unwrap().remove(field);

                let error = rule_set.validate(&broken).unwrap_err();
                assert_eq!(error.len(), 1, "{} without {}", rule_set.name(), field);
                assert_eq!(error.violations[0].path, field);
                assert_eq!(error.violations[0].code, ViolationCode::MissingRequired);
            }
        }
    }

    #[test]
    fn test_missing_nested_field_path() {
        let mut broken = envelope();
        broken["payload"].as_object_mut().unwrap().remove("nonce");
        let error = payment::payment_envelope().validate(&broken).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].path, "payload.nonce");
        assert_eq!(error.violations[0].code, ViolationCode::MissingRequired);
    }
}

#[cfg(test)]
mod primitives {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ethereum_address_scenario() {
        let error = payment::ethereum_address().validate(&json!("0xabc")).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].path, "");
        assert_eq!(error.violations[0].code, ViolationCode::PatternMismatch);
    }

    #[test]
    fn test_address_shapes() {
        let rule_set = payment::ethereum_address();
        assert!(rule_set.validate(&json!(address('0'))).is_ok());
        assert!(rule_set.validate(&json!(format!("0x{}", "a".repeat(41)))).is_err());
        assert!(rule_set.validate(&json!(format!("0X{}", "a".repeat(40)))).is_err());
        assert!(rule_set.validate(&json!(format!("0x{}", "g".repeat(40)))).is_err());
    }

    #[test]
    fn test_networks() {
        for name in ["avalanche", "base", "celo", "avalanche-fuji", "base-sepolia", "celo-alfajores"] {
            assert!(payment::network().validate(&json!(name)).is_ok(), "{}", name);
        }
        let error = payment::network().validate(&json!("ethereum")).unwrap_err();
        assert_eq!(error.violations[0].code, ViolationCode::InvalidEnumValue);
    }

    #[test]
    fn test_caip2() {
        assert!(payment::caip2_network().validate(&json!("eip155:1")).is_ok());
        let error = payment::caip2_network().validate(&json!("solana:mainnet")).unwrap_err();
        assert_eq!(
            error.violations[0].message,
            "Invalid CAIP-2 network format. Expected: eip155:<chainId>"
        );
    }

    #[test]
    fn test_transaction_hash_length() {
        assert!(payment::transaction_hash()
            .validate(&json!(format!("0x{}", "a".repeat(63))))
            .is_err());
    }

    #[test]
    fn test_signature_requires_hex_digits() {
        assert!(payment::signature().validate(&json!("0x")).is_err());
        assert!(payment::signature().validate(&json!("deadbeef")).is_err());
    }

    #[test]
    fn test_price_alternatives() {
        let price = payment::price();
        assert_eq!(price.validate(&json!("10")).unwrap(), json!("10"));
        assert_eq!(price.validate(&json!(0.5)).unwrap(), json!(0.5));

        let error = price.validate(&json!("1.2.3")).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].code, ViolationCode::PatternMismatch);
        assert_eq!(error.violations[0].message, "Invalid price format");

        let error = price.validate(&json!(-1)).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].code, ViolationCode::OutOfRange);

        let error = price.validate(&json!(true)).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].code, ViolationCode::InvalidType);
    }

    #[test]
    fn test_payment_header_prefix() {
        let error = payment::payment_header().validate(&json!("Bearer abc")).unwrap_err();
        assert_eq!(error.violations[0].message, "Payment header must start with 'x402'");
        assert!(payment::payment_header().validate(&json!("X402 abc")).is_ok());
    }
}

#[cfg(test)]
mod composites {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_negative_valid_before_scenario() {
        let mut value = envelope();
        value["payload"]["validBefore"] = json!(-5);
        let error = payment::payment_envelope().validate(&value).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].path, "payload.validBefore");
        assert_eq!(error.violations[0].code, ViolationCode::OutOfRange);
    }

    #[test]
    fn test_envelope_network_needs_ascii_chain_id() {
        let mut value = envelope();
        value["payload"]["network"] = json!("eip155:\u{ff11}\u{ff12}\u{ff13}");
        let error = payment::payment_envelope().validate(&value).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].path, "payload.network");
        assert_eq!(error.violations[0].code, ViolationCode::PatternMismatch);
    }

    #[test]
    fn test_envelope_collects_every_violation() {
        let mut value = envelope();
        value["payload"]["from"] = json!("0x1");
        value["payload"]["value"] = json!("");
        value["signature"] = json!("nope");
        let error = payment::payment_envelope().validate(&value).unwrap_err();
        let paths: Vec<_> = error.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["payload.from", "payload.value", "signature"]);
        assert_eq!(error.violations[1].message, "Value is required");
    }

    #[test]
    fn test_price_table_entries_are_checked() {
        let error = payment::payment_config()
            .validate(&json!({
                "recipientAddress": address('a'),
                "network": "base",
                "prices": {"/ok": "0.01", "/bad": "free"}
            }))
            .unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].path, "prices./bad");
    }

    #[test]
    fn test_token_decimals_bounds() {
        let token = |decimals: Value| {
            json!({"address": address('a'), "name": "T", "symbol": "T", "decimals": decimals, "chainId": 1})
        };
        assert!(payment::token_info().validate(&token(json!(0))).is_ok());
        assert!(payment::token_info().validate(&token(json!(18))).is_ok());

        let error = payment::token_info().validate(&token(json!(19))).unwrap_err();
        assert_eq!(error.violations[0].code, ViolationCode::OutOfRange);
        let error = payment::token_info().validate(&token(json!(6.5))).unwrap_err();
        assert_eq!(error.violations[0].code, ViolationCode::InvalidType);
    }

    #[test]
    fn test_tolerance_range() {
        let error = payment::payment_verification()
            .validate(&json!({
                "envelope": envelope(),
                "expectedAmount": "1",
                "expectedRecipient": address('b'),
                "tolerance": 1.5
            }))
            .unwrap_err();
        assert_eq!(error.violations[0].path, "tolerance");
        assert_eq!(error.violations[0].code, ViolationCode::OutOfRange);
    }

    #[test]
    fn test_payment_error_scenario() {
        let error = payment::payment_error()
            .validate(&json!({"error": "x", "code": "BOGUS"}))
            .unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.violations[0].path, "code");
        assert_eq!(error.violations[0].code, ViolationCode::InvalidEnumValue);
    }

    #[test]
    fn test_settlement_result_hash_format() {
        let error = payment::settlement_result()
            .validate(&json!({"success": false, "transactionHash": "0x12"}))
            .unwrap_err();
        assert_eq!(error.violations[0].path, "transactionHash");
        assert_eq!(error.violations[0].message, "Invalid transaction hash");
    }
}

#[cfg(test)]
mod typed_payloads {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_parse() {
        let envelope = payment::PaymentEnvelope::parse(&envelope()).unwrap();
        assert_eq!(envelope.payload.valid_before, 1735689600);
        assert_eq!(
            payment::Network::from_caip2(&envelope.payload.network),
            Some(payment::Network::BaseSepolia)
        );
        assert!(envelope.payload.is_valid_at(1_700_000_000));
    }

    #[test]
    fn test_accepted_chain_id_fits_typed_form() {
        let token = |chain_id: Value| {
            json!({"address": address('a'), "name": "T", "symbol": "T", "decimals": 6, "chainId": chain_id})
        };

        let info = payment::TokenInfo::parse(&token(json!(8453.0))).unwrap();
        assert_eq!(info.chain_id, 8453);

        let error = payment::token_info().validate(&token(json!(1e20))).unwrap_err();
        assert_eq!(error.violations[0].path, "chainId");
        assert_eq!(error.violations[0].code, ViolationCode::OutOfRange);
        assert!(matches!(
            payment::TokenInfo::parse(&token(json!(1e20))),
            Err(perkos_validators::Error::Validation(_))
        ));
    }

    #[test]
    fn test_price_variants() {
        assert_eq!(
            payment::Price::parse(&json!("0.01")).unwrap(),
            payment::Price::Text("0.01".to_string())
        );
        assert_eq!(payment::Price::parse(&json!(2)).unwrap(), payment::Price::Amount(2.0));
    }

    #[test]
    fn test_config_parse() {
        let (_, sample) = samples()
            .into_iter()
            .find(|(rule_set, _)| rule_set.name() == "payment-config")
            .unwrap();
        let config = payment::PaymentConfig::parse(&sample).unwrap();
        assert_eq!(config.network, payment::Network::BaseSepolia);
        assert_eq!(config.prices.len(), 2);
        assert_eq!(config.prices["/api/ai/text"].amount(), Some(0.01));
    }

    #[test]
    fn test_error_code_parse() {
        let error = payment::PaymentError::parse(&json!({
            "error": "Not enough funds",
            "code": "INSUFFICIENT_BALANCE"
        }))
        .unwrap();
        assert_eq!(error.code, payment::PaymentErrorCode::InsufficientBalance);
        assert_eq!(error.details, None);
    }

    #[test]
    fn test_remaining_typed_forms() {
        for (rule_set, sample) in samples() {
            let parsed = match rule_set.name() {
                "route-config" => payment::RouteConfig::parse(&sample).map(|_| ()),
                "payment-request" => payment::PaymentRequest::parse(&sample).map(|_| ()),
                "payment-verification" => payment::PaymentVerification::parse(&sample).map(|_| ()),
                "token-info" => payment::TokenInfo::parse(&sample).map(|_| ()),
                "eip712-domain" => payment::Eip712Domain::parse(&sample).map(|_| ()),
                "settlement-request" => payment::SettlementRequest::parse(&sample).map(|_| ()),
                "settlement-result" => payment::SettlementResult::parse(&sample).map(|_| ()),
                "network" => payment::Network::parse(&sample).map(|_| ()),
                _ => continue,
            };
            assert!(parsed.is_ok(), "{}: {:?}", rule_set.name(), parsed);
        }
    }
}
