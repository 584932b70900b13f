//! Background fetch task: requests in, `AppEvent`s out.
//!
//! Owns the OpenSea client for the session. Every request gets a reply, even
//! on failure (the action layer degrades to empty defaults), so the UI can
//! always clear its loading state. Requests are not cancelable; the
//! controller discards superseded responses by token.

use crate::actions;
use crate::catalog::Collection;
use crate::config::Config;
use crate::opensea::OpenSeaClient;
use crate::types::{AppEvent, FetchRequest};
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run_fetch(
    cfg: Config,
    collection: Collection,
    mut request_rx: UnboundedReceiver<FetchRequest>,
    event_tx: UnboundedSender<AppEvent>,
) -> Result<()> {
    let client = OpenSeaClient::new(&cfg.api_url, cfg.api_key.clone(), cfg.http_timeout_ms);

    while let Some(request) = request_rx.recv().await {
        let event = match request {
            FetchRequest::MarketData { token, sort } => {
                log::info!("[fetch] market data for {sort} (token {token})");
                let items = actions::market_data(
                    &client,
                    sort,
                    &collection,
                    cfg.market_limit,
                    cfg.market_cache_secs,
                )
                .await;
                AppEvent::MarketData { token, sort, items }
            }
            FetchRequest::ItemHistory { token, identifier } => {
                log::info!("[fetch] detail context for item {identifier}");
                let events = actions::nft_events(&client, &collection, &identifier).await;
                let market = actions::item_market_context(&client, &collection, &identifier).await;
                AppEvent::ItemHistory { token, identifier, events, market }
            }
            FetchRequest::CollectionInfo => {
                log::info!("[fetch] stats + metadata for {}", collection.slug);
                let stats = actions::collection_stats(&client, collection.slug).await;
                let meta = actions::collection_metadata(&client, collection.slug).await;
                AppEvent::CollectionInfo { stats, meta }
            }
        };

        if event_tx.send(event).is_err() {
            break; // UI is gone
        }
    }

    log::info!("[fetch] task shutting down");
    Ok(())
}
