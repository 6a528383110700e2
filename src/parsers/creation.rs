use crate::classifier::is_mint_initialization;
use crate::error::Error;
use crate::events::{ContractCreationEvent, DomainEvent, TokenCreationEvent};
use crate::parsers::fee_payer;
use crate::protocols::CONTRACT_CREATION_PROGRAM_IDS;
use crate::types::{Instruction, TransactionRecord};

/// Event for the first inner mint initialization.
pub fn parse_token_creation(record: &TransactionRecord) -> Option<Result<DomainEvent, Error>> {
    let ix = record
        .inner_instructions_flat()
        .find(|ix| is_mint_initialization(ix))?
        .as_parsed()?;

    let build = || -> Result<DomainEvent, Error> {
        let mint = ix
            .info_str("mint")
            .ok_or_else(|| Error::parse(format!("{} missing mint", ix.kind)))?;
        let decimals = ix
            .info
            .get("decimals")
            .and_then(|v| v.as_u64())
            .map(u8::try_from)
            .transpose()
            .map_err(|e| Error::parse(format!("{} decimals out of range: {e}", ix.kind)))?;

        Ok(DomainEvent::TokenCreation(TokenCreationEvent {
            signature: record.signature.clone(),
            mint: mint.to_string(),
            decimals,
            mint_authority: ix.info_str("mintAuthority").map(str::to_string),
            freeze_authority: ix.info_str("freezeAuthority").map(str::to_string),
            creator: fee_payer(record)?,
            timestamp: record.block_time,
        }))
    };
    Some(build())
}

/// Event for the first top-level loader instruction. Opaque loader
/// instructions carry no type or program account.
pub fn parse_contract_creation(record: &TransactionRecord) -> Option<Result<DomainEvent, Error>> {
    let ix = record
        .instructions
        .iter()
        .find(|ix| CONTRACT_CREATION_PROGRAM_IDS.contains(&ix.program_id()))?;

    let (instruction_type, program_account) = match ix {
        Instruction::Parsed(p) => (
            Some(p.kind.clone()).filter(|k| !k.is_empty()),
            p.info_str("programAccount").map(str::to_string),
        ),
        Instruction::Opaque(_) => (None, None),
    };

    Some(fee_payer(record).map(|deployer| {
        DomainEvent::ContractCreation(ContractCreationEvent {
            signature: record.signature.clone(),
            deployer,
            instruction_type,
            program_account,
            timestamp: record.block_time,
        })
    }))
}
