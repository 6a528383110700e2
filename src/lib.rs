#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod amount;
pub mod classifier;
pub mod error;
pub mod events;
pub mod parsers;
pub mod protocols;
pub mod types;
pub mod wire;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod pipeline;
#[cfg(feature = "native")]
pub mod rpc;
#[cfg(feature = "native")]
pub mod slots;

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
pub(crate) mod testing;

pub use amount::TokenAmount;
pub use classifier::{Classification, DexMatch, classify};
pub use error::Error;
pub use events::{
    ContractCreationEvent, DomainEvent, LiquidityEvent, LiquidityOperation, SwapEvent,
    TokenCreationEvent, TokenLeg, TransferEvent,
};
pub use parsers::{TransferLeg, extract_event};
pub use protocols::{Dex, DexAdapter, adapter_for};
pub use types::{
    Block, InnerInstructionGroup, Instruction, OpaqueInstruction, ParsedInstruction, Slot,
    TokenBalance, TransactionRecord,
};

#[cfg(feature = "native")]
pub use config::{Config, FetcherConfig, SolanaConfig};
#[cfg(feature = "native")]
pub use pipeline::{BlockFetcher, EventSink, LogSink, RetryPolicy};
#[cfg(feature = "native")]
pub use rpc::{BlockSource, Commitment, RpcBlockSource};
