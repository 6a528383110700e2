//! Record builders shared by unit tests.

use crate::protocols::{TOKEN_PROGRAM, TOKEN_PROGRAM_ID};
use crate::types::{
    InnerInstructionGroup, Instruction, OpaqueInstruction, ParsedInstruction, TokenBalance,
    TransactionRecord,
};

pub(crate) struct RecordBuilder {
    record: TransactionRecord,
}

impl RecordBuilder {
    pub(crate) fn new(signature: &str) -> Self {
        Self {
            record: TransactionRecord {
                signature: signature.to_string(),
                account_keys: vec!["Trader".to_string()],
                instructions: Vec::new(),
                inner_instructions: Vec::new(),
                succeeded: true,
                block_time: Some(1_700_000_000),
                pre_token_balances: Vec::new(),
                post_token_balances: Vec::new(),
            },
        }
    }

    pub(crate) fn accounts(mut self, keys: &[&str]) -> Self {
        self.record.account_keys = keys.iter().map(|k| (*k).to_string()).collect();
        self
    }

    pub(crate) fn instruction(mut self, ix: Instruction) -> Self {
        self.record.instructions.push(ix);
        self
    }

    pub(crate) fn inner(mut self, index: usize, instructions: Vec<Instruction>) -> Self {
        self.record
            .inner_instructions
            .push(InnerInstructionGroup {
                index,
                instructions,
            });
        self
    }

    pub(crate) fn post_balance(mut self, account_index: usize, mint: &str, amount: &str) -> Self {
        self.record.post_token_balances.push(TokenBalance {
            account_index,
            mint: mint.to_string(),
            amount: amount.to_string(),
        });
        self
    }

    pub(crate) fn failed(mut self) -> Self {
        self.record.succeeded = false;
        self
    }

    pub(crate) fn build(self) -> TransactionRecord {
        self.record
    }
}

pub(crate) fn parsed(
    program: &str,
    program_id: &str,
    kind: &str,
    info: serde_json::Value,
) -> Instruction {
    Instruction::Parsed(ParsedInstruction {
        program: program.to_string(),
        program_id: program_id.to_string(),
        kind: kind.to_string(),
        info,
    })
}

pub(crate) fn token_ix(kind: &str, info: serde_json::Value) -> Instruction {
    parsed(TOKEN_PROGRAM, TOKEN_PROGRAM_ID, kind, info)
}

/// Inner `spl-token` transfer with an explicit mint (`transferChecked`) or
/// without one (`transfer`).
pub(crate) fn leg(source: &str, destination: &str, amount: &str, mint: Option<&str>) -> Instruction {
    match mint {
        Some(mint) => token_ix(
            "transferChecked",
            serde_json::json!({
                "source": source,
                "destination": destination,
                "mint": mint,
                "tokenAmount": {"amount": amount},
            }),
        ),
        None => token_ix(
            "transfer",
            serde_json::json!({
                "source": source,
                "destination": destination,
                "amount": amount,
            }),
        ),
    }
}

pub(crate) fn opaque(program_id: &str, data: &[u8]) -> Instruction {
    opaque_with_accounts(program_id, &[], data)
}

pub(crate) fn opaque_with_accounts(program_id: &str, accounts: &[&str], data: &[u8]) -> Instruction {
    Instruction::Opaque(OpaqueInstruction {
        program_id: program_id.to_string(),
        accounts: accounts.iter().map(|a| (*a).to_string()).collect(),
        data: data.to_vec(),
    })
}
