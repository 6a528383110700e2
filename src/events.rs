use serde::Serialize;

use crate::amount::TokenAmount;
use crate::protocols::Dex;

/// Structured event extracted from one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DomainEvent {
    Swap(SwapEvent),
    Liquidity(LiquidityEvent),
    Transfer(TransferEvent),
    TokenCreation(TokenCreationEvent),
    ContractCreation(ContractCreationEvent),
}

impl DomainEvent {
    pub fn signature(&self) -> &str {
        match self {
            Self::Swap(e) => &e.signature,
            Self::Liquidity(e) => &e.signature,
            Self::Transfer(e) => &e.signature,
            Self::TokenCreation(e) => &e.signature,
            Self::ContractCreation(e) => &e.signature,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Swap(_) => "swap",
            Self::Liquidity(_) => "liquidity",
            Self::Transfer(_) => "transfer",
            Self::TokenCreation(_) => "tokenCreation",
            Self::ContractCreation(_) => "contractCreation",
        }
    }

    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Self::Swap(e) => e.timestamp,
            Self::Liquidity(e) => e.timestamp,
            Self::Transfer(e) => e.timestamp,
            Self::TokenCreation(e) => e.timestamp,
            Self::ContractCreation(e) => e.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapEvent {
    pub dex: Dex,
    pub signature: String,
    /// Fee payer of the transaction.
    pub trader_account: String,
    /// Destination of the first inner transfer leg.
    pub token_in: String,
    pub amount_in: TokenAmount,
    /// Source of the last inner transfer leg.
    pub token_out: String,
    pub amount_out: TokenAmount,
    pub timestamp: Option<i64>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LiquidityOperation {
    Add,
    Remove,
}

/// One side of a liquidity event. `mint` is empty when it could not be
/// recovered from the instruction or the balance snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenLeg {
    pub mint: String,
    pub amount: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityEvent {
    pub dex: Dex,
    pub signature: String,
    pub operation: LiquidityOperation,
    pub trader_account: String,
    pub token_a: TokenLeg,
    pub token_b: TokenLeg,
    pub lp_token: Option<TokenLeg>,
    pub pool_address: Option<String>,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEvent {
    pub signature: String,
    pub source: String,
    pub destination: String,
    /// Lamports for native transfers, token base units otherwise.
    pub amount: TokenAmount,
    pub token_mint: Option<String>,
    pub is_native_transfer: bool,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCreationEvent {
    pub signature: String,
    pub mint: String,
    pub decimals: Option<u8>,
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
    /// Fee payer of the creating transaction.
    pub creator: String,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCreationEvent {
    pub signature: String,
    pub deployer: String,
    /// Loader instruction type, e.g. `deployWithMaxDataLen`, when the node parsed it.
    pub instruction_type: Option<String>,
    pub program_account: Option<String>,
    pub timestamp: Option<i64>,
}
