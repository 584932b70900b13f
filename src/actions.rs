//! Failure-boundary layer over the OpenSea client.
//!
//! Nothing above this module ever observes a raw error: every operation
//! degrades to a safe default (None or an empty list) and logs, so the UI
//! always has something to render. Per-item normalization failures drop the
//! item, never the batch.

use crate::catalog::Collection;
use crate::opensea::OpenSeaClient;
use crate::types::{
    AssetEvent, CollectionMeta, CollectionStats, ItemMarketContext, MarketItem, SortOption,
};
use crate::util_text::{format_price, humanize_when, scaled_price};
use serde_json::Value;

pub async fn nft_detail(client: &OpenSeaClient, collection: &Collection, identifier: &str) -> Option<Value> {
    match client
        .single_nft(collection.chain, collection.contract, identifier)
        .await
    {
        // The detail endpoint wraps the asset in an `nft` object
        Ok(data) => Some(data.get("nft").cloned().unwrap_or(data)),
        Err(e) => {
            log::warn!("[actions] nft_detail({identifier}) failed: {e}");
            None
        }
    }
}

pub async fn nft_events(client: &OpenSeaClient, collection: &Collection, identifier: &str) -> Vec<AssetEvent> {
    match client
        .nft_events(collection.chain, collection.contract, identifier)
        .await
    {
        Ok(data) => data
            .pointer("/asset_events")
            .and_then(|v| v.as_array())
            .map(|events| events.iter().map(normalize_asset_event).collect())
            .unwrap_or_default(),
        Err(e) => {
            log::warn!("[actions] nft_events({identifier}) failed: {e}");
            Vec::new()
        }
    }
}

pub async fn best_listing(client: &OpenSeaClient, collection: &Collection, identifier: &str) -> Option<Value> {
    match client
        .best_listing(collection.chain, collection.contract, identifier)
        .await
    {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("[actions] best_listing({identifier}) failed: {e}");
            None
        }
    }
}

pub async fn collection_traits(client: &OpenSeaClient, slug: &str) -> Option<Value> {
    match client.collection_traits(slug).await {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("[actions] collection_traits({slug}) failed: {e}");
            None
        }
    }
}

pub async fn item_offers(client: &OpenSeaClient, collection: &Collection, identifier: &str) -> Vec<Value> {
    match client
        .item_offers(collection.chain, "seaport", collection.contract, identifier)
        .await
    {
        Ok(data) => data
            .pointer("/orders")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default(),
        Err(e) => {
            log::warn!("[actions] item_offers({identifier}) failed: {e}");
            Vec::new()
        }
    }
}

/// Stats live inside the response's `total` object.
pub async fn collection_stats(client: &OpenSeaClient, slug: &str) -> Option<CollectionStats> {
    match client.collection_stats(slug).await {
        Ok(data) => data
            .get("total")
            .and_then(|total| serde_json::from_value(total.clone()).ok()),
        Err(e) => {
            log::warn!("[actions] collection_stats({slug}) failed: {e}");
            None
        }
    }
}

pub async fn collection_metadata(client: &OpenSeaClient, slug: &str) -> Option<CollectionMeta> {
    match client.collection_metadata(slug).await {
        Ok(data) => serde_json::from_value(data).ok(),
        Err(e) => {
            log::warn!("[actions] collection_metadata({slug}) failed: {e}");
            None
        }
    }
}

/// Market context for the detail overlay: active listing, highest item-level
/// bid, and current owner. Three independent lookups; each degrades to None
/// on its own.
pub async fn item_market_context(
    client: &OpenSeaClient,
    collection: &Collection,
    identifier: &str,
) -> ItemMarketContext {
    let listing = best_listing(client, collection, identifier)
        .await
        .and_then(|l| l.pointer("/price/current").and_then(price_from_value))
        .map(|p| format_price(p, "ETH"));

    // Orders come back highest first; the first one is the top bid
    let top_offer = item_offers(client, collection, identifier)
        .await
        .first()
        .and_then(|order| order.get("current_price")?.as_str().map(String::from))
        .map(|wei| format_price(scaled_price(&wei, 18), "WETH"));

    let owner = nft_detail(client, collection, identifier)
        .await
        .and_then(|nft| {
            nft.pointer("/owners/0/address")
                .and_then(|v| v.as_str())
                .map(String::from)
        });

    ItemMarketContext { listing, top_offer, owner }
}

/// The hybrid-sort operation: fetch the collection-wide endpoint matching the
/// sort mode and normalize each entry into a `MarketItem`. Any failure in the
/// whole operation yields an empty list; a malformed entry is dropped alone.
pub async fn market_data(
    client: &OpenSeaClient,
    sort: SortOption,
    collection: &Collection,
    limit: u32,
    cache_secs: u64,
) -> Vec<MarketItem> {
    let result = match sort {
        SortOption::PriceAsc => client
            .collection_listings(collection.slug, limit, cache_secs)
            .await
            .map(|data| {
                entries(&data, "/listings")
                    .iter()
                    .map(|l| normalize_collection_listing(l, collection.chain))
                    .collect::<Vec<_>>()
            }),
        SortOption::LastSale => client
            .collection_sale_events(collection.slug, limit, cache_secs)
            .await
            .map(|data| {
                entries(&data, "/asset_events")
                    .iter()
                    .map(|e| normalize_sale_event(e, collection.chain))
                    .collect::<Vec<_>>()
            }),
        SortOption::BestOffer => client
            .collection_offers(collection.slug, limit, cache_secs)
            .await
            .map(|data| {
                entries(&data, "/offers")
                    .iter()
                    .map(|o| normalize_collection_offer(o, collection.chain))
                    .collect::<Vec<_>>()
            }),
        SortOption::TokenId => Ok(Vec::new()),
    };

    match result {
        Ok(items) => dedup_by_identifier(items.into_iter().flatten().collect()),
        Err(e) => {
            log::warn!("[actions] market_data({sort}) failed: {e}");
            Vec::new()
        }
    }
}

fn entries(data: &Value, pointer: &str) -> Vec<Value> {
    data.pointer(pointer)
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

/// `/listings/collection/{slug}/all`: the sold token id sits inside the
/// seaport parameters' first offer item; the price under `price.current`.
pub fn normalize_collection_listing(listing: &Value, chain: &str) -> Option<MarketItem> {
    let params = listing.pointer("/protocol_data/parameters")?;
    let offer_item = params.pointer("/offer/0")?;

    let token_id = offer_item.get("identifierOrCriteria")?.as_str()?.to_string();

    let price = listing
        .pointer("/price/current")
        .and_then(price_from_value)
        .unwrap_or(0.0);

    Some(MarketItem {
        identifier: token_id,
        display_price: format_price(price, "ETH"),
        contract: params.get("offerer").and_then(|v| v.as_str()).map(String::from),
        chain: chain.to_string(),
    })
}

/// `/events/collection/{slug}?event_type=sale`: price from the payment
/// quantity/decimals pair, labeled as a sale.
pub fn normalize_sale_event(event: &Value, chain: &str) -> Option<MarketItem> {
    let identifier = event.pointer("/nft/identifier")?.as_str()?.to_string();

    let price = event
        .get("payment")
        .and_then(|p| {
            let quantity = p.get("quantity")?.as_str()?;
            let decimals = p.get("decimals")?.as_u64()? as u32;
            Some(scaled_price(quantity, decimals))
        })
        .unwrap_or(0.0);

    Some(MarketItem {
        identifier,
        display_price: format!("Sold: {}", format_price(price, "ETH")),
        contract: event.get("contract").and_then(|v| v.as_str()).map(String::from),
        chain: chain.to_string(),
    })
}

/// `/offers/collection/{slug}/all`: the requested token id is the first
/// consideration item. Criteria-wide bids carry an empty or "0" id and are
/// excluded; they cannot be mapped to one grid image. Bids settle in WETH.
pub fn normalize_collection_offer(offer: &Value, chain: &str) -> Option<MarketItem> {
    let params = offer.pointer("/protocol_data/parameters")?;
    let consideration = params.pointer("/consideration/0")?;

    let token_id = consideration.get("identifierOrCriteria")?.as_str()?;
    if token_id.is_empty() || token_id == "0" {
        return None;
    }

    let price = offer.get("price").and_then(price_from_value).unwrap_or(0.0);

    Some(MarketItem {
        identifier: token_id.to_string(),
        display_price: format!("Bid: {}", format_price(price, "WETH")),
        contract: None,
        chain: chain.to_string(),
    })
}

fn price_from_value(price: &Value) -> Option<f64> {
    let value = price.get("value")?.as_str()?;
    let decimals = price.get("decimals")?.as_u64()? as u32;
    Some(scaled_price(value, decimals))
}

/// Keep the first entry seen for each identifier, preserving order.
pub fn dedup_by_identifier(items: Vec<MarketItem>) -> Vec<MarketItem> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.identifier.clone()))
        .collect()
}

fn normalize_asset_event(event: &Value) -> AssetEvent {
    let event_type = event
        .get("event_type")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let price_label = event.get("payment").and_then(|p| {
        let quantity = p.get("quantity")?.as_str()?;
        let decimals = p.get("decimals")?.as_u64()? as u32;
        let symbol = p.get("symbol").and_then(|v| v.as_str()).unwrap_or("ETH");
        Some(format_price(scaled_price(quantity, decimals), symbol))
    });

    let actor = |keys: [&str; 2]| -> Option<String> {
        keys.iter()
            .find_map(|k| event.get(*k).and_then(|v| v.as_str()))
            .map(String::from)
    };

    let when = event
        .get("event_timestamp")
        .map(|v| match v {
            Value::String(s) => humanize_when(s),
            Value::Number(n) => humanize_when(&n.to_string()),
            _ => String::new(),
        })
        .unwrap_or_default();

    AssetEvent {
        event_type,
        price_label,
        from: actor(["from_address", "seller"]),
        to: actor(["to_address", "buyer"]),
        when,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_normalization_extracts_token_and_price() {
        let listing = json!({
            "protocol_data": {"parameters": {
                "offerer": "0xseller",
                "offer": [{"identifierOrCriteria": "7"}]
            }},
            "price": {"current": {"value": "1500000000000000000", "decimals": 18}}
        });
        let item = normalize_collection_listing(&listing, "ethereum").unwrap();
        assert_eq!(item.identifier, "7");
        assert_eq!(item.display_price, "1.5000 ETH");
        assert_eq!(item.contract.as_deref(), Some("0xseller"));
        assert_eq!(item.chain, "ethereum");
    }

    #[test]
    fn listing_without_offer_item_is_dropped() {
        let listing = json!({
            "protocol_data": {"parameters": {"offer": []}},
            "price": {"current": {"value": "1", "decimals": 18}}
        });
        assert!(normalize_collection_listing(&listing, "ethereum").is_none());
    }

    #[test]
    fn sale_event_price_from_quantity_and_decimals() {
        let event = json!({
            "nft": {"identifier": "12"},
            "payment": {"quantity": "2500000", "decimals": 6},
            "contract": "0xc0ffee"
        });
        let item = normalize_sale_event(&event, "ethereum").unwrap();
        assert_eq!(item.display_price, "Sold: 2.5000 ETH");
        assert_eq!(item.contract.as_deref(), Some("0xc0ffee"));
    }

    #[test]
    fn criteria_offers_are_excluded() {
        for bad_id in ["0", ""] {
            let offer = json!({
                "protocol_data": {"parameters": {
                    "consideration": [{"identifierOrCriteria": bad_id}]
                }},
                "price": {"value": "1000000000000000000", "decimals": 18}
            });
            assert!(normalize_collection_offer(&offer, "ethereum").is_none());
        }
    }

    #[test]
    fn item_offer_is_labeled_as_weth_bid() {
        let offer = json!({
            "protocol_data": {"parameters": {
                "consideration": [{"identifierOrCriteria": "33"}]
            }},
            "price": {"value": "250000000000000000", "decimals": 18}
        });
        let item = normalize_collection_offer(&offer, "ethereum").unwrap();
        assert_eq!(item.identifier, "33");
        assert_eq!(item.display_price, "Bid: 0.2500 WETH");
        assert!(item.contract.is_none());
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let mk = |id: &str, price: &str| MarketItem {
            identifier: id.into(),
            display_price: price.into(),
            contract: None,
            chain: "ethereum".into(),
        };
        let out = dedup_by_identifier(vec![mk("1", "a"), mk("2", "b"), mk("1", "c")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].identifier, "1");
        assert_eq!(out[0].display_price, "a");
        assert_eq!(out[1].identifier, "2");
    }

    #[test]
    fn asset_event_normalization_tolerates_missing_fields() {
        let ev = normalize_asset_event(&json!({}));
        assert_eq!(ev.event_type, "unknown");
        assert!(ev.price_label.is_none());
        assert!(ev.from.is_none());
    }
}
