//! Serde model of the `getBlock` / `getTransaction` result in `jsonParsed`
//! encoding, and its conversion into [`Block`] and [`TransactionRecord`].

use serde::Deserialize;

use crate::types::{
    Block, InnerInstructionGroup, Instruction, OpaqueInstruction, ParsedInstruction, Slot,
    TokenBalance, TransactionRecord,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiBlock {
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub parent_slot: Option<Slot>,
    /// Kept raw so one undecodable entry cannot fail the whole block.
    #[serde(default)]
    pub transactions: Vec<serde_json::Value>,
}

impl UiBlock {
    /// Entries that do not decode are logged with their signature and
    /// skipped.
    pub fn into_block(self, slot: Slot) -> Block {
        let block_time = self.block_time;
        let transactions = self
            .transactions
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| decode_entry(slot, index, raw, block_time))
            .collect();
        Block {
            slot,
            parent_slot: self.parent_slot,
            block_time,
            transactions,
        }
    }
}

fn decode_entry(
    slot: Slot,
    index: usize,
    raw: serde_json::Value,
    block_time: Option<i64>,
) -> Option<TransactionRecord> {
    let signature = raw
        .pointer("/transaction/signatures/0")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    match serde_json::from_value::<UiTransactionWithMeta>(raw) {
        Ok(tx) => Some(tx.into_record(block_time)),
        Err(e) => {
            tracing::warn!(
                slot,
                index,
                signature = signature.as_deref().unwrap_or("unknown"),
                error = %e,
                "skipping undecodable transaction"
            );
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UiTransactionWithMeta {
    pub transaction: UiTransaction,
    #[serde(default)]
    pub meta: Option<UiTransactionMeta>,
}

impl UiTransactionWithMeta {
    pub fn into_record(self, block_time: Option<i64>) -> TransactionRecord {
        let UiTransaction {
            signatures,
            message,
        } = self.transaction;
        let meta = self.meta.unwrap_or_default();

        TransactionRecord {
            signature: signatures.into_iter().next().unwrap_or_default(),
            account_keys: message
                .account_keys
                .into_iter()
                .map(UiAccountKey::into_pubkey)
                .collect(),
            instructions: message
                .instructions
                .into_iter()
                .map(UiInstruction::into_instruction)
                .collect(),
            inner_instructions: meta
                .inner_instructions
                .unwrap_or_default()
                .into_iter()
                .map(|group| InnerInstructionGroup {
                    index: group.index,
                    instructions: group
                        .instructions
                        .into_iter()
                        .map(UiInstruction::into_instruction)
                        .collect(),
                })
                .collect(),
            succeeded: meta.err.is_none(),
            block_time,
            pre_token_balances: convert_balances(meta.pre_token_balances),
            post_token_balances: convert_balances(meta.post_token_balances),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UiTransaction {
    #[serde(default)]
    pub signatures: Vec<String>,
    pub message: UiMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiMessage {
    #[serde(default)]
    pub account_keys: Vec<UiAccountKey>,
    #[serde(default)]
    pub instructions: Vec<UiInstruction>,
}

/// `jsonParsed` reports `{pubkey, signer, writable, source}`; `json` reports
/// a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UiAccountKey {
    Parsed { pubkey: String },
    Raw(String),
}

impl UiAccountKey {
    fn into_pubkey(self) -> String {
        match self {
            Self::Parsed { pubkey } | Self::Raw(pubkey) => pubkey,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTransactionMeta {
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub inner_instructions: Option<Vec<UiInnerInstructions>>,
    #[serde(default)]
    pub pre_token_balances: Option<Vec<UiTokenBalance>>,
    #[serde(default)]
    pub post_token_balances: Option<Vec<UiTokenBalance>>,
}

#[derive(Debug, Deserialize)]
pub struct UiInnerInstructions {
    pub index: usize,
    #[serde(default)]
    pub instructions: Vec<UiInstruction>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UiInstruction {
    Parsed(UiParsedInstruction),
    PartiallyDecoded(UiPartiallyDecodedInstruction),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiParsedInstruction {
    pub program: String,
    pub program_id: String,
    pub parsed: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPartiallyDecodedInstruction {
    pub program_id: String,
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Base58-encoded instruction data.
    #[serde(default)]
    pub data: String,
}

impl UiInstruction {
    fn into_instruction(self) -> Instruction {
        match self {
            Self::Parsed(ix) => {
                let (kind, info) = match ix.parsed {
                    serde_json::Value::Object(mut obj) => {
                        let kind = obj
                            .get("type")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string();
                        let info = obj.remove("info").unwrap_or(serde_json::Value::Null);
                        (kind, info)
                    }
                    other => (String::new(), other),
                };
                Instruction::Parsed(ParsedInstruction {
                    program: ix.program,
                    program_id: ix.program_id,
                    kind,
                    info,
                })
            }
            Self::PartiallyDecoded(ix) => {
                let data = bs58::decode(&ix.data).into_vec().unwrap_or_else(|e| {
                    tracing::debug!(program_id = %ix.program_id, error = %e, "undecodable instruction data");
                    Vec::new()
                });
                Instruction::Opaque(OpaqueInstruction {
                    program_id: ix.program_id,
                    accounts: ix.accounts,
                    data,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenBalance {
    pub account_index: usize,
    pub mint: String,
    pub ui_token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
pub struct UiTokenAmount {
    pub amount: String,
}

fn convert_balances(balances: Option<Vec<UiTokenBalance>>) -> Vec<TokenBalance> {
    balances
        .unwrap_or_default()
        .into_iter()
        .map(|b| TokenBalance {
            account_index: b.account_index,
            mint: b.mint,
            amount: b.ui_token_amount.amount,
        })
        .collect()
}
