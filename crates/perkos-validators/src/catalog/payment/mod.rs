//! x402 payment protocol rule sets
//!
//! Primitive format rules (networks, addresses, hashes, signatures, prices)
//! come first; composite rule sets embed copies of them for their fields.
//! Only textual shape is checked here. Signature recovery, balances and
//! settlement belong to the facilitator.
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

pub mod types;

pub use types::*;

use super::{Catalog, RuleSet};
use crate::validation::{EnumRule, NumberRule, ObjectRule, Rule, TextRule};
use regex::Regex;

/// Compile one of the literal patterns below
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("catalog patterns are valid regular expressions")
}

fn address() -> Rule {
    ethereum_address().rule().clone()
}

// Network & chain primitives

rule_set! {
    /// Supported chain names, production and test networks
    pub fn network => "network", Catalog::Payment,
    EnumRule::new(Network::ALL.iter().map(|network| network.as_str()))
}

rule_set! {
    /// `eip155:<chainId>`
    pub fn caip2_network => "caip2-network", Catalog::Payment,
    TextRule::new().pattern(
        pattern(r"^eip155:[0-9]+$"),
        "Invalid CAIP-2 network format. Expected: eip155:<chainId>",
    )
}

rule_set! {
    pub fn ethereum_address => "ethereum-address", Catalog::Payment,
    TextRule::new().pattern(pattern(r"^0x[a-fA-F0-9]{40}$"), "Invalid Ethereum address")
}

rule_set! {
    pub fn transaction_hash => "transaction-hash", Catalog::Payment,
    TextRule::new().pattern(pattern(r"^0x[a-fA-F0-9]{64}$"), "Invalid transaction hash")
}

rule_set! {
    pub fn signature => "signature", Catalog::Payment,
    TextRule::new().pattern(pattern(r"^0x[a-fA-F0-9]+$"), "Invalid signature format")
}

rule_set! {
    /// Decimal string such as `"0.01"`, or a positive number
    pub fn price => "price", Catalog::Payment,
    Rule::union([
        Rule::from(TextRule::new().pattern(pattern(r"^[0-9]+(\.[0-9]+)?$"), "Invalid price format")),
        Rule::from(NumberRule::decimal().positive()),
    ])
}

// Payment envelope

rule_set! {
    /// Signed transfer authorization carried in the payment header
    pub fn payment_envelope => "payment-envelope", Catalog::Payment,
    ObjectRule::new()
        .required(
            "payload",
            ObjectRule::new()
                .required("from", address())
                .required("to", address())
                .required("value", TextRule::new().non_empty("Value is required"))
                .required("validAfter", NumberRule::integer().nonnegative())
                .required("validBefore", NumberRule::integer().positive())
                .required("nonce", TextRule::new().non_empty("Nonce is required"))
                .required("network", caip2_network().rule().clone()),
        )
        .required("signature", signature().rule().clone())
}

rule_set! {
    pub fn payment_header => "payment-header", Catalog::Payment,
    TextRule::new().pattern(pattern(r"(?i)^x402\s+"), "Payment header must start with 'x402'")
}

// Payment configuration

rule_set! {
    pub fn payment_config => "payment-config", Catalog::Payment,
    ObjectRule::new()
        .required("recipientAddress", address())
        .required("network", network().rule().clone())
        .optional("tokenAddress", address())
        .required("prices", Rule::record(price().rule().clone()))
}

rule_set! {
    pub fn route_config => "route-config", Catalog::Payment,
    ObjectRule::new()
        .required("path", TextRule::new().non_empty("Path is required"))
        .required("price", price().rule().clone())
        .optional("description", TextRule::new())
}

// Payment requests

rule_set! {
    pub fn payment_request => "payment-request", Catalog::Payment,
    ObjectRule::new()
        .required("amount", price().rule().clone())
        .required("recipient", address())
        .required("network", network().rule().clone())
        .optional("memo", TextRule::new())
        .optional("expiresAt", NumberRule::integer().positive())
}

rule_set! {
    pub fn payment_verification => "payment-verification", Catalog::Payment,
    ObjectRule::new()
        .required("envelope", payment_envelope().rule().clone())
        .required("expectedAmount", TextRule::new())
        .required("expectedRecipient", address())
        .defaulted("tolerance", NumberRule::decimal().min(0.0).max(1.0), 0)
}

// Tokens

rule_set! {
    pub fn token_info => "token-info", Catalog::Payment,
    ObjectRule::new()
        .required("address", address())
        .required("name", TextRule::new())
        .required("symbol", TextRule::new())
        .required("decimals", NumberRule::integer().min(0.0).max(18.0))
        .required("chainId", NumberRule::integer().positive())
}

rule_set! {
    /// EIP-712 signing domain of a token contract
    pub fn eip712_domain => "eip712-domain", Catalog::Payment,
    ObjectRule::new()
        .required("name", TextRule::new())
        .required("version", TextRule::new())
        .required("chainId", NumberRule::integer().positive())
        .required("verifyingContract", address())
}

// Settlement

rule_set! {
    pub fn settlement_request => "settlement-request", Catalog::Payment,
    ObjectRule::new()
        .required("envelope", payment_envelope().rule().clone())
        .optional("privateKey", TextRule::new())
}

rule_set! {
    pub fn settlement_result => "settlement-result", Catalog::Payment,
    ObjectRule::new()
        .required("success", Rule::boolean())
        .optional("transactionHash", transaction_hash().rule().clone())
        .optional("error", TextRule::new())
        .optional("gasUsed", TextRule::new())
}

// Error responses

rule_set! {
    pub fn payment_error => "payment-error", Catalog::Payment,
    ObjectRule::new()
        .required("error", TextRule::new())
        .required(
            "code",
            EnumRule::new(PaymentErrorCode::ALL.iter().map(|code| code.as_str())),
        )
        .optional("details", Rule::record(Rule::any()))
}

/// Every payment rule set, primitives first
pub fn all() -> Vec<&'static RuleSet> {
    vec![
        network(),
        caip2_network(),
        ethereum_address(),
        transaction_hash(),
        signature(),
        price(),
        payment_envelope(),
        payment_header(),
        payment_config(),
        route_config(),
        payment_request(),
        payment_verification(),
        token_info(),
        eip712_domain(),
        settlement_request(),
        settlement_result(),
        payment_error(),
    ]
}

impl_validated! {
    Network => network,
    Price => price,
    PaymentEnvelope => payment_envelope,
    PaymentConfig => payment_config,
    RouteConfig => route_config,
    PaymentRequest => payment_request,
    PaymentVerification => payment_verification,
    TokenInfo => token_info,
    Eip712Domain => eip712_domain,
    SettlementRequest => settlement_request,
    SettlementResult => settlement_result,
    PaymentError => payment_error,
}
