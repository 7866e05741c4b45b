//! Typed forms of the payment rule sets
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// `0x` followed by 40 hex digits
pub type EthereumAddress = String;
/// `0x` followed by 64 hex digits
pub type TransactionHash = String;
pub type Signature = String;
/// `eip155:<chainId>`
pub type Caip2Network = String;

/// Chains a facilitator can settle on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Avalanche,
    Base,
    Celo,
    AvalancheFuji,
    BaseSepolia,
    CeloAlfajores,
}

impl Network {
    pub const ALL: [Network; 6] = [
        Network::Avalanche,
        Network::Base,
        Network::Celo,
        Network::AvalancheFuji,
        Network::BaseSepolia,
        Network::CeloAlfajores,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avalanche => "avalanche",
            Self::Base => "base",
            Self::Celo => "celo",
            Self::AvalancheFuji => "avalanche-fuji",
            Self::BaseSepolia => "base-sepolia",
            Self::CeloAlfajores => "celo-alfajores",
        }
    }

    /// EIP-155 chain id
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Avalanche => 43114,
            Self::Base => 8453,
            Self::Celo => 42220,
            Self::AvalancheFuji => 43113,
            Self::BaseSepolia => 84532,
            Self::CeloAlfajores => 44787,
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(
            self,
            Self::AvalancheFuji | Self::BaseSepolia | Self::CeloAlfajores
        )
    }

    /// The CAIP-2 identifier, as used inside payment envelopes
    pub fn caip2(&self) -> Caip2Network {
        format!("eip155:{}", self.chain_id())
    }

    /// Reverse of [`Network::caip2`]
    pub fn from_caip2(id: &str) -> Option<Self> {
        let chain_id: u64 = id.strip_prefix("eip155:")?.parse().ok()?;
        Self::ALL
            .into_iter()
            .find(|network| network.chain_id() == chain_id)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price, either a decimal string or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Text(String),
    Amount(f64),
}

impl Price {
    /// Numeric value of the price
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Text(text) => text.parse().ok(),
            Self::Amount(amount) => Some(*amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub from: EthereumAddress,
    pub to: EthereumAddress,
    pub value: String,
    pub valid_after: u64,
    pub valid_before: u64,
    pub nonce: String,
    pub network: Caip2Network,
}

impl PaymentPayload {
    /// Whether `timestamp` (unix seconds) falls inside the validity window
    pub fn is_valid_at(&self, timestamp: u64) -> bool {
        self.valid_after <= timestamp && timestamp < self.valid_before
    }
}

/// Signed payment carried by the `X-PAYMENT` header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEnvelope {
    pub payload: PaymentPayload,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    pub recipient_address: EthereumAddress,
    pub network: Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<EthereumAddress>,
    pub prices: HashMap<String, Price>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Price,
    pub recipient: EthereumAddress,
    pub network: Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub envelope: PaymentEnvelope,
    pub expected_amount: String,
    pub expected_recipient: EthereumAddress,
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: EthereumAddress,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: EthereumAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRequest {
    pub envelope: PaymentEnvelope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<TransactionHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,
}

/// Business failure reported to a paying client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentErrorCode {
    MissingPayment,
    InvalidSignature,
    InvalidAmount,
    ExpiredPayment,
    InsufficientBalance,
    SettlementFailed,
    NetworkMismatch,
}

impl PaymentErrorCode {
    pub const ALL: [PaymentErrorCode; 7] = [
        PaymentErrorCode::MissingPayment,
        PaymentErrorCode::InvalidSignature,
        PaymentErrorCode::InvalidAmount,
        PaymentErrorCode::ExpiredPayment,
        PaymentErrorCode::InsufficientBalance,
        PaymentErrorCode::SettlementFailed,
        PaymentErrorCode::NetworkMismatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingPayment => "MISSING_PAYMENT",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::ExpiredPayment => "EXPIRED_PAYMENT",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::SettlementFailed => "SETTLEMENT_FAILED",
            Self::NetworkMismatch => "NETWORK_MISMATCH",
        }
    }
}

impl fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentError {
    pub error: String,
    pub code: PaymentErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}
