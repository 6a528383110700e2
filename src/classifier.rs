//! Static program-id and parsed-type matching over one transaction.
//!
//! Every predicate is infallible: a missing or malformed field is simply
//! "no match".

use serde::Serialize;

use crate::protocols::{
    CONTRACT_CREATION_PROGRAM_IDS, Dex, MINT_INITIALIZATION_TYPES, SYSTEM_PROGRAM, TOKEN_PROGRAM,
    TOKEN_PROGRAM_ID, TOKEN_TRANSFER_TYPES,
};
use crate::types::{Instruction, TransactionRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DexMatch {
    pub dex: Dex,
    pub program_id: String,
}

/// Every category a transaction falls into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub dex: Option<DexMatch>,
    pub transfer: bool,
    pub token_creation: bool,
    pub contract_creation: bool,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.dex.is_none() && !self.transfer && !self.token_creation && !self.contract_creation
    }
}

pub fn classify(record: &TransactionRecord) -> Classification {
    Classification {
        dex: match_dex(record),
        transfer: match_transfer(record),
        token_creation: match_token_creation(record),
        contract_creation: match_contract_creation(record),
    }
}

/// First top-level instruction addressed to a known DEX program.
pub fn match_dex(record: &TransactionRecord) -> Option<DexMatch> {
    record.instructions.iter().find_map(|ix| {
        let program_id = ix.program_id();
        Dex::from_program_id(program_id).map(|dex| DexMatch {
            dex,
            program_id: program_id.to_string(),
        })
    })
}

pub fn match_token_creation(record: &TransactionRecord) -> bool {
    record
        .inner_instructions_flat()
        .any(is_mint_initialization)
}

pub fn match_contract_creation(record: &TransactionRecord) -> bool {
    record
        .instructions
        .iter()
        .any(|ix| CONTRACT_CREATION_PROGRAM_IDS.contains(&ix.program_id()))
}

pub fn match_transfer(record: &TransactionRecord) -> bool {
    record.instructions.iter().any(|ix| {
        ix.as_parsed().is_some_and(|p| {
            p.is(SYSTEM_PROGRAM, "transfer")
                || (p.program == TOKEN_PROGRAM && TOKEN_TRANSFER_TYPES.contains(&p.kind.as_str()))
        })
    })
}

pub(crate) fn is_mint_initialization(ix: &Instruction) -> bool {
    ix.as_parsed().is_some_and(|p| {
        p.program_id == TOKEN_PROGRAM_ID && MINT_INITIALIZATION_TYPES.contains(&p.kind.as_str())
    })
}
