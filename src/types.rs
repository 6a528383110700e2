/// Position of a block-production opportunity in the ledger.
pub type Slot = u64;

/// A retrieved block, reduced to what event extraction needs.
#[derive(Debug, Clone)]
pub struct Block {
    /// Slot the block was produced in.
    pub slot: Slot,
    pub parent_slot: Option<Slot>,
    /// Estimated production time (unix seconds), if the node reports one.
    pub block_time: Option<i64>,
    /// Transactions in ledger order.
    pub transactions: Vec<TransactionRecord>,
}

/// One decoded transaction with its instruction tree and token balances.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// First transaction signature (base58).
    pub signature: String,
    /// Account keys in message order, including lookup-table addresses.
    /// The first key is the fee payer.
    pub account_keys: Vec<String>,
    /// Top-level instructions in execution order.
    pub instructions: Vec<Instruction>,
    /// CPI groups, each tied to the top-level instruction that emitted it.
    pub inner_instructions: Vec<InnerInstructionGroup>,
    /// `false` when the transaction executed with an error.
    pub succeeded: bool,
    /// Block time inherited from the enclosing block.
    pub block_time: Option<i64>,
    pub pre_token_balances: Vec<TokenBalance>,
    pub post_token_balances: Vec<TokenBalance>,
}

impl TransactionRecord {
    /// The fee payer, used as the trader/creator account of an event.
    pub fn fee_payer(&self) -> Option<&str> {
        self.account_keys.first().map(String::as_str)
    }

    pub fn account_index(&self, pubkey: &str) -> Option<usize> {
        self.account_keys.iter().position(|k| k == pubkey)
    }

    /// Mint of the token account at `pubkey`, from the post-execution snapshot.
    pub fn post_balance_mint(&self, pubkey: &str) -> Option<&str> {
        let idx = self.account_index(pubkey)?;
        self.post_token_balances
            .iter()
            .find(|b| b.account_index == idx)
            .map(|b| b.mint.as_str())
    }

    /// Every inner instruction, flattened across groups in emission order.
    pub fn inner_instructions_flat(&self) -> impl Iterator<Item = &Instruction> {
        self.inner_instructions
            .iter()
            .flat_map(|group| group.instructions.iter())
    }
}

#[derive(Debug, Clone)]
pub struct InnerInstructionGroup {
    /// Index of the parent top-level instruction.
    pub index: usize,
    pub instructions: Vec<Instruction>,
}

/// An instruction as delivered by the node: decoded by the node's parser for
/// well-known programs, raw bytes for everything else.
#[derive(Debug, Clone)]
pub enum Instruction {
    Parsed(ParsedInstruction),
    Opaque(OpaqueInstruction),
}

impl Instruction {
    pub fn program_id(&self) -> &str {
        match self {
            Self::Parsed(ix) => &ix.program_id,
            Self::Opaque(ix) => &ix.program_id,
        }
    }

    pub fn as_parsed(&self) -> Option<&ParsedInstruction> {
        match self {
            Self::Parsed(ix) => Some(ix),
            Self::Opaque(_) => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueInstruction> {
        match self {
            Self::Parsed(_) => None,
            Self::Opaque(ix) => Some(ix),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedInstruction {
    /// Parser name, e.g. `"system"` or `"spl-token"`.
    pub program: String,
    pub program_id: String,
    /// Parsed instruction type, e.g. `"transferChecked"`. Empty when the
    /// node's parser produced a bare value instead of `{type, info}`.
    pub kind: String,
    /// Parsed instruction arguments.
    pub info: serde_json::Value,
}

impl ParsedInstruction {
    pub fn is(&self, program: &str, kind: &str) -> bool {
        self.program == program && self.kind == kind
    }

    pub fn info_str(&self, key: &str) -> Option<&str> {
        self.info.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct OpaqueInstruction {
    pub program_id: String,
    /// Instruction account list, in order.
    pub accounts: Vec<String>,
    /// Decoded instruction data. Empty if the payload could not be decoded.
    pub data: Vec<u8>,
}

impl OpaqueInstruction {
    /// Leading byte of the payload, the instruction tag for most native programs.
    pub fn discriminator(&self) -> Option<u8> {
        self.data.first().copied()
    }
}

/// Token balance snapshot entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    /// Index into [`TransactionRecord::account_keys`].
    pub account_index: usize,
    pub mint: String,
    /// Raw amount in base units, as reported.
    pub amount: String,
}
