pub mod raydium;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::error::Error;
use crate::events::DomainEvent;
use crate::protocols::raydium::RaydiumAdapter;
use crate::types::TransactionRecord;

pub const RAYDIUM_AMM_PROGRAM_ID: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
pub const RAYDIUM_CAMM_PROGRAM_ID: &str = "CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK";
pub const SERUM_PROGRAM_ID: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
pub const ORCA_WHIRLPOOL_PROGRAM_ID: &str = "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc";
pub const JUPITER_V6_PROGRAM_ID: &str = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4";
pub const PUMP_FUN_PROGRAM_ID: &str = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P";
pub const PHOENIX_PROGRAM_ID: &str = "PhoeNiXZ8ByJGLkxNfZRnkUfjvmuYqLR89jjFHGqdXY";

pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const BPF_UPGRADEABLE_LOADER_PROGRAM_ID: &str = "BPFLoaderUpgradeab1e11111111111111111111111";

/// Parser names the node reports in `program` for parsed instructions.
pub const SYSTEM_PROGRAM: &str = "system";
pub const TOKEN_PROGRAM: &str = "spl-token";

pub const CONTRACT_CREATION_PROGRAM_IDS: &[&str] = &[BPF_UPGRADEABLE_LOADER_PROGRAM_ID];

pub const MINT_INITIALIZATION_TYPES: &[&str] = &["initializeMint", "initializeMint2"];

pub const TOKEN_TRANSFER_TYPES: &[&str] = &["transfer", "transferChecked"];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::EnumIter,
)]
pub enum Dex {
    Raydium,
    #[serde(rename = "Raydium_CAMM")]
    #[strum(serialize = "Raydium_CAMM")]
    RaydiumCamm,
    Serum,
    Orca,
    Jupiter,
    PumpFun,
    Phoenix,
}

impl Dex {
    pub fn from_program_id(program_id: &str) -> Option<Self> {
        match program_id {
            RAYDIUM_AMM_PROGRAM_ID => Some(Self::Raydium),
            RAYDIUM_CAMM_PROGRAM_ID => Some(Self::RaydiumCamm),
            SERUM_PROGRAM_ID => Some(Self::Serum),
            ORCA_WHIRLPOOL_PROGRAM_ID => Some(Self::Orca),
            JUPITER_V6_PROGRAM_ID => Some(Self::Jupiter),
            PUMP_FUN_PROGRAM_ID => Some(Self::PumpFun),
            PHOENIX_PROGRAM_ID => Some(Self::Phoenix),
            _ => None,
        }
    }

    pub fn program_id(self) -> &'static str {
        match self {
            Self::Raydium => RAYDIUM_AMM_PROGRAM_ID,
            Self::RaydiumCamm => RAYDIUM_CAMM_PROGRAM_ID,
            Self::Serum => SERUM_PROGRAM_ID,
            Self::Orca => ORCA_WHIRLPOOL_PROGRAM_ID,
            Self::Jupiter => JUPITER_V6_PROGRAM_ID,
            Self::PumpFun => PUMP_FUN_PROGRAM_ID,
            Self::Phoenix => PHOENIX_PROGRAM_ID,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raydium => "Raydium",
            Self::RaydiumCamm => "Raydium_CAMM",
            Self::Serum => "Serum",
            Self::Orca => "Orca",
            Self::Jupiter => "Jupiter",
            Self::PumpFun => "PumpFun",
            Self::Phoenix => "Phoenix",
        }
    }
}

/// Protocol-specific event extraction for one DEX.
///
/// `None` means the transaction carries no recognizable event for this
/// protocol; `Some(Err(_))` means it looked like one but a payload was
/// malformed.
pub trait DexAdapter: Sync {
    fn dex(&self) -> Dex;

    fn parse(&self, record: &TransactionRecord) -> Option<Result<DomainEvent, Error>>;
}

/// Every known DEX with its program id, in table order.
pub fn known_dexes() -> impl Iterator<Item = (Dex, &'static str)> {
    Dex::iter().map(|dex| (dex, dex.program_id()))
}

/// Adapter for a classified DEX. DEXes without one are recognized but yield
/// no event.
pub fn adapter_for(dex: Dex) -> Option<&'static dyn DexAdapter> {
    match dex {
        Dex::Raydium => Some(&RaydiumAdapter),
        Dex::RaydiumCamm
        | Dex::Serum
        | Dex::Orca
        | Dex::Jupiter
        | Dex::PumpFun
        | Dex::Phoenix => None,
    }
}
