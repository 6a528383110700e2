//! Event extraction: `(transaction) -> event | none`.
//!
//! Parsers return `Option<Result<DomainEvent, Error>>`. `None` is a normal
//! outcome (not enough legs, no discriminator, unsupported DEX); `Some(Err)`
//! is a malformed payload that the caller logs against the signature.

pub mod creation;
pub mod liquidity;
pub mod swap;
pub mod transfer;

use crate::amount::TokenAmount;
use crate::classifier::classify;
use crate::error::Error;
use crate::events::DomainEvent;
use crate::protocols::{TOKEN_PROGRAM_ID, TOKEN_TRANSFER_TYPES, adapter_for};
use crate::types::{ParsedInstruction, TransactionRecord};

/// Token movement derived from one parsed `spl-token` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLeg {
    pub source: String,
    /// Empty for burns.
    pub destination: String,
    pub amount: TokenAmount,
    pub mint: Option<String>,
}

impl TransferLeg {
    /// Leg of a `transfer` / `transferChecked`. The source falls back to the
    /// authority when the payload omits it.
    pub fn from_transfer(ix: &ParsedInstruction) -> Result<Self, Error> {
        let source = ix
            .info_str("source")
            .or_else(|| ix.info_str("authority"))
            .ok_or_else(|| missing(ix, "source"))?;
        let destination = ix
            .info_str("destination")
            .ok_or_else(|| missing(ix, "destination"))?;
        Ok(Self {
            source: source.to_string(),
            destination: destination.to_string(),
            amount: instruction_amount(ix)?,
            mint: ix.info_str("mint").map(str::to_string),
        })
    }

    /// Leg of a `burn` / `burnChecked`, carried as a negative amount out of
    /// the burned account.
    pub fn from_burn(ix: &ParsedInstruction) -> Result<Self, Error> {
        let account = ix
            .info_str("account")
            .ok_or_else(|| missing(ix, "account"))?;
        Ok(Self {
            source: account.to_string(),
            destination: String::new(),
            amount: -instruction_amount(ix)?,
            mint: ix.info_str("mint").map(str::to_string),
        })
    }
}

fn missing(ix: &ParsedInstruction, field: &str) -> Error {
    Error::parse(format!("{} {} missing {field}", ix.program, ix.kind))
}

/// `info.amount`, or `info.tokenAmount.amount` for the checked variants.
fn instruction_amount(ix: &ParsedInstruction) -> Result<TokenAmount, Error> {
    let value = ix
        .info
        .get("amount")
        .or_else(|| ix.info.get("tokenAmount").and_then(|t| t.get("amount")))
        .ok_or_else(|| missing(ix, "amount"))?;
    TokenAmount::from_json(value)
}

/// Every inner `spl-token` transfer/transferChecked, in emission order.
pub fn collect_transfer_legs(record: &TransactionRecord) -> Result<Vec<TransferLeg>, Error> {
    record
        .inner_instructions_flat()
        .filter_map(|ix| ix.as_parsed())
        .filter(|p| p.program_id == TOKEN_PROGRAM_ID && TOKEN_TRANSFER_TYPES.contains(&p.kind.as_str()))
        .map(TransferLeg::from_transfer)
        .collect()
}

/// Transfer legs plus inner burns, in emission order.
pub fn collect_transfer_and_burn_legs(
    record: &TransactionRecord,
) -> Result<Vec<TransferLeg>, Error> {
    let mut legs = Vec::new();
    for p in record.inner_instructions_flat().filter_map(|ix| ix.as_parsed()) {
        if p.program_id != TOKEN_PROGRAM_ID {
            continue;
        }
        match p.kind.as_str() {
            "transfer" | "transferChecked" => legs.push(TransferLeg::from_transfer(p)?),
            "burn" | "burnChecked" => legs.push(TransferLeg::from_burn(p)?),
            _ => {}
        }
    }
    Ok(legs)
}

pub(crate) fn fee_payer(record: &TransactionRecord) -> Result<String, Error> {
    record
        .fee_payer()
        .map(str::to_string)
        .ok_or_else(|| Error::parse("transaction has no account keys"))
}

/// Classify, then run the matching parser.
///
/// A DEX match is final: transfer and creation parsers only run for
/// transactions that touch no known DEX, in that order, first event wins.
pub fn extract_event(record: &TransactionRecord) -> Option<Result<DomainEvent, Error>> {
    let classification = classify(record);

    if let Some(dex_match) = classification.dex {
        let Some(adapter) = adapter_for(dex_match.dex) else {
            tracing::debug!(
                signature = %record.signature,
                dex = %dex_match.dex,
                "dex recognized but not parsed"
            );
            return None;
        };
        return adapter.parse(record);
    }

    if classification.transfer
        && let Some(result) = transfer::parse_transfer(record)
    {
        return Some(result);
    }
    if classification.token_creation
        && let Some(result) = creation::parse_token_creation(record)
    {
        return Some(result);
    }
    if classification.contract_creation {
        return creation::parse_contract_creation(record);
    }
    None
}
