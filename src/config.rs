//! Environment configuration.
//!
//! `SOLANA_*` variables describe the upstream node, `FETCHER_*` variables tune
//! the block fetcher. A `.env` file in the working directory is loaded first
//! when present.

use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;
use crate::pipeline::retry::RetryPolicy;
use crate::rpc::Commitment;

#[derive(Debug, Clone)]
pub struct Config {
    pub solana: SolanaConfig,
    pub fetcher: FetcherConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!(error = %e, "failed to load .env file");
        }
        Self::from_vars(std::env::vars())
    }

    /// Build from an explicit variable set, without touching the process
    /// environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        Ok(Self {
            solana: envy::prefixed("SOLANA_").from_iter(vars.iter().cloned())?,
            fetcher: envy::prefixed("FETCHER_").from_iter(vars)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaConfig {
    /// JSON-RPC HTTP endpoint used for `getBlock`.
    #[serde(default = "default_rpc_endpoint")]
    pub rpc_endpoint: String,

    /// Websocket endpoint used for `slotSubscribe`.
    #[serde(default = "default_ws_endpoint")]
    pub ws_endpoint: String,

    #[serde(default)]
    pub commitment: Commitment,
}

fn default_rpc_endpoint() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}

fn default_ws_endpoint() -> String {
    "wss://api.mainnet-beta.solana.com".to_string()
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: default_rpc_endpoint(),
            ws_endpoint: default_ws_endpoint(),
            commitment: Commitment::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Transactions processed concurrently per chunk. 0 is treated as 1.
    pub chunk_size: usize,

    /// Retries after the first failed `getBlock` before the slot is dropped.
    pub max_retries: u32,

    /// Retry `n` waits `backoff_base_ms * 2^n`.
    pub backoff_base_ms: u64,

    /// Run failed transactions through the classifier too.
    pub include_failed_transactions: bool,

    /// Pause after each processed block.
    pub inter_block_delay_ms: u64,

    pub request_timeout_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            chunk_size: 20,
            max_retries: 5,
            backoff_base_ms: 1000,
            include_failed_transactions: false,
            inter_block_delay_ms: 100,
            request_timeout_ms: 30_000,
        }
    }
}

impl FetcherConfig {
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base: Duration::from_millis(self.backoff_base_ms),
        }
    }

    pub fn inter_block_delay(&self) -> Duration {
        Duration::from_millis(self.inter_block_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
