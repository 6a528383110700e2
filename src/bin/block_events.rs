//! Follows the chain head: subscribes to slot notifications and logs every
//! event extracted from each produced block.

use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

use block_event_indexer::{BlockFetcher, Config, LogSink, RpcBlockSource, slots};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to parse environment configuration");
            exit(1);
        }
    };

    let source = match RpcBlockSource::new(
        config.solana.rpc_endpoint.clone(),
        config.solana.commitment,
        config.fetcher.request_timeout(),
    ) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "failed to build rpc client");
            exit(1);
        }
    };

    info!(
        rpc = %config.solana.rpc_endpoint,
        ws = %config.solana.ws_endpoint,
        commitment = %config.solana.commitment,
        chunk_size = config.fetcher.chunk_size(),
        "starting block ingestion"
    );

    let fetcher = BlockFetcher::new(Arc::new(source), Arc::new(LogSink), config.fetcher);

    loop {
        match slots::subscribe(&config.solana.ws_endpoint).await {
            Ok(stream) => match fetcher.run(stream).await {
                Ok(()) => warn!("slot subscription ended"),
                Err(e) => warn!(error = %e, "slot subscription failed"),
            },
            Err(e) => warn!(error = %e, "failed to connect slot subscription"),
        }
        info!(delay_s = RECONNECT_DELAY.as_secs(), backlog = fetcher.backlog_len(), "reconnecting");
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}
