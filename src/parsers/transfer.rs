use crate::amount::TokenAmount;
use crate::error::Error;
use crate::events::{DomainEvent, TransferEvent};
use crate::parsers::TransferLeg;
use crate::protocols::{SYSTEM_PROGRAM, TOKEN_PROGRAM, TOKEN_TRANSFER_TYPES};
use crate::types::{ParsedInstruction, TransactionRecord};

/// Native transfer first, then token transfer. Only top-level instructions
/// are considered.
pub fn parse_transfer(record: &TransactionRecord) -> Option<Result<DomainEvent, Error>> {
    parse_native_transfer(record).or_else(|| parse_token_transfer(record))
}

pub fn parse_native_transfer(record: &TransactionRecord) -> Option<Result<DomainEvent, Error>> {
    let ix = record
        .instructions
        .iter()
        .filter_map(|ix| ix.as_parsed())
        .find(|p| p.is(SYSTEM_PROGRAM, "transfer"))?;
    Some(native_event(record, ix))
}

fn native_event(record: &TransactionRecord, ix: &ParsedInstruction) -> Result<DomainEvent, Error> {
    let field = |key: &str| {
        ix.info_str(key)
            .map(str::to_string)
            .ok_or_else(|| Error::parse(format!("system transfer missing {key}")))
    };
    let lamports = ix
        .info
        .get("lamports")
        .ok_or_else(|| Error::parse("system transfer missing lamports"))?;

    Ok(DomainEvent::Transfer(TransferEvent {
        signature: record.signature.clone(),
        source: field("source")?,
        destination: field("destination")?,
        amount: TokenAmount::from_json(lamports)?,
        token_mint: None,
        is_native_transfer: true,
        timestamp: record.block_time,
    }))
}

/// `transferChecked` names its mint; a plain `transfer` borrows it from the
/// destination's post-balance entry, if any.
pub fn parse_token_transfer(record: &TransactionRecord) -> Option<Result<DomainEvent, Error>> {
    let ix = record
        .instructions
        .iter()
        .filter_map(|ix| ix.as_parsed())
        .find(|p| p.program == TOKEN_PROGRAM && TOKEN_TRANSFER_TYPES.contains(&p.kind.as_str()))?;

    Some(TransferLeg::from_transfer(ix).map(|leg| {
        let token_mint = if ix.kind == "transferChecked" {
            leg.mint
        } else {
            record.post_balance_mint(&leg.destination).map(str::to_string)
        };
        DomainEvent::Transfer(TransferEvent {
            signature: record.signature.clone(),
            source: leg.source,
            destination: leg.destination,
            amount: leg.amount,
            token_mint,
            is_native_transfer: false,
            timestamp: record.block_time,
        })
    }))
}
