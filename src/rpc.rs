//! Block retrieval over JSON-RPC.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::Error;
use crate::types::{Block, Slot};
use crate::wire::UiBlock;

/// Slot was skipped, or its block was not produced.
pub const SLOT_SKIPPED: i64 = -32007;
/// Block is not available in long-term storage.
pub const BLOCK_NOT_AVAILABLE: i64 = -32009;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Commitment {
    #[default]
    Confirmed,
    Finalized,
}

/// Where the fetcher gets blocks from.
///
/// `Ok(None)` is a slot with no block; `Err` is transient and retried.
#[async_trait]
pub trait BlockSource: Send + Sync + 'static {
    async fn get_block(&self, slot: Slot) -> Result<Option<Block>, Error>;
}

pub struct RpcBlockSource {
    client: Client,
    endpoint: String,
    commitment: Commitment,
    next_id: AtomicU64,
}

impl RpcBlockSource {
    pub fn new(endpoint: impl Into<String>, commitment: Commitment, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            commitment,
            next_id: AtomicU64::new(1),
        })
    }

    fn request(&self, slot: Slot) -> serde_json::Value {
        json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": "getBlock",
            "params": [
                slot,
                {
                    "encoding": "jsonParsed",
                    "maxSupportedTransactionVersion": 0,
                    "transactionDetails": "full",
                    "rewards": false,
                    "commitment": self.commitment.as_ref(),
                }
            ]
        })
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<UiBlock>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Split a `getBlock` response into block, missing block or error.
pub(crate) fn block_from_response(
    slot: Slot,
    body: &[u8],
) -> Result<Option<Block>, Error> {
    let response: RpcResponse = serde_json::from_slice(body)?;
    if let Some(err) = response.error {
        return match err.code {
            SLOT_SKIPPED | BLOCK_NOT_AVAILABLE => {
                tracing::debug!(slot, code = err.code, message = %err.message, "no block for slot");
                Ok(None)
            }
            code => Err(Error::Rpc {
                code,
                message: err.message,
            }),
        };
    }
    Ok(response.result.map(|block| block.into_block(slot)))
}

#[async_trait]
impl BlockSource for RpcBlockSource {
    async fn get_block(&self, slot: Slot) -> Result<Option<Block>, Error> {
        let body = self
            .client
            .post(&self.endpoint)
            .json(&self.request(slot))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        block_from_response(slot, &body)
    }
}
