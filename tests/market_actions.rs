//! Normalization tests for the market-data action helpers: response-shape
//! coercion, price scaling, criteria-offer exclusion and deduplication.

use seadeck::actions::{
    dedup_by_identifier, normalize_collection_listing, normalize_collection_offer,
    normalize_sale_event,
};
use seadeck::types::MarketItem;
use seadeck::util_text::scaled_price;
use serde_json::json;

#[test]
fn listing_price_is_value_over_ten_pow_decimals() {
    let listing = json!({
        "protocol_data": {"parameters": {
            "offerer": "0x1111111111111111111111111111111111111111",
            "offer": [{"identifierOrCriteria": "42"}]
        }},
        "price": {"current": {"value": "1500000000000000000", "decimals": 18}}
    });

    let item = normalize_collection_listing(&listing, "ethereum").expect("valid listing");
    assert_eq!(item.identifier, "42");
    assert_eq!(item.display_price, "1.5000 ETH");
}

#[test]
fn listing_missing_offered_item_is_discarded() {
    let no_offer = json!({
        "protocol_data": {"parameters": {}},
        "price": {"current": {"value": "1", "decimals": 18}}
    });
    assert!(normalize_collection_listing(&no_offer, "ethereum").is_none());

    let no_protocol_data = json!({"price": {}});
    assert!(normalize_collection_listing(&no_protocol_data, "ethereum").is_none());
}

#[test]
fn listing_with_missing_price_falls_back_to_zero() {
    let listing = json!({
        "protocol_data": {"parameters": {
            "offer": [{"identifierOrCriteria": "9"}]
        }}
    });
    let item = normalize_collection_listing(&listing, "ethereum").unwrap();
    assert_eq!(item.display_price, "0.0000 ETH");
}

#[test]
fn sale_event_is_labeled_sold_with_scaled_quantity() {
    let event = json!({
        "nft": {"identifier": "7"},
        "payment": {"quantity": "2500000", "decimals": 6},
        "contract": "0x9e1dadf6eb875cf927c85a430887f2945039f923"
    });
    let item = normalize_sale_event(&event, "ethereum").expect("valid sale event");
    assert_eq!(item.identifier, "7");
    assert_eq!(item.display_price, "Sold: 2.5000 ETH");
    assert_eq!(item.chain, "ethereum");
}

#[test]
fn sale_event_without_nft_is_discarded() {
    let event = json!({"payment": {"quantity": "1", "decimals": 18}});
    assert!(normalize_sale_event(&event, "ethereum").is_none());
}

#[test]
fn collection_wide_offers_are_excluded() {
    // identifierOrCriteria "0" and "" both mean a criteria bid with no
    // specific token; neither can be mapped to a grid image.
    for bad in ["0", ""] {
        let offer = json!({
            "protocol_data": {"parameters": {
                "consideration": [{"identifierOrCriteria": bad}]
            }},
            "price": {"value": "1000000000000000000", "decimals": 18}
        });
        assert!(normalize_collection_offer(&offer, "ethereum").is_none());
    }
}

#[test]
fn specific_item_offer_becomes_weth_bid() {
    let offer = json!({
        "protocol_data": {"parameters": {
            "consideration": [{"identifierOrCriteria": "15"}]
        }},
        "price": {"value": "750000000000000000", "decimals": 18}
    });
    let item = normalize_collection_offer(&offer, "ethereum").expect("specific offer");
    assert_eq!(item.identifier, "15");
    assert_eq!(item.display_price, "Bid: 0.7500 WETH");
    assert!(item.contract.is_none());
}

#[test]
fn dedup_keeps_first_seen_and_preserves_order() {
    let mk = |id: &str, tag: &str| MarketItem {
        identifier: id.to_string(),
        display_price: tag.to_string(),
        contract: None,
        chain: "ethereum".to_string(),
    };
    let out = dedup_by_identifier(vec![
        mk("5", "first"),
        mk("3", "second"),
        mk("5", "dup"),
        mk("8", "third"),
        mk("3", "dup"),
    ]);
    let ids: Vec<&str> = out.iter().map(|i| i.identifier.as_str()).collect();
    assert_eq!(ids, vec!["5", "3", "8"]);
    assert_eq!(out[0].display_price, "first");
}

#[test]
fn price_scaling_reference_values() {
    assert!((scaled_price("1500000000000000000", 18) - 1.5).abs() < 1e-9);
    assert!((scaled_price("2500000", 6) - 2.5).abs() < 1e-9);
    assert_eq!(scaled_price("0", 18), 0.0);
}
