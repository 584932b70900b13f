//! Controller-level tests driven through the library crate, using the
//! bundled catalog as the base dataset.

use seadeck::app::App;
use seadeck::catalog::{collection_or_default, load_catalog};
use seadeck::theme::Theme;
use seadeck::types::{AppEvent, MarketItem, SortOption};

fn new_app() -> App {
    let collection = collection_or_default("parodee-pixel-chaos");
    let catalog = load_catalog(&collection).expect("bundled catalog");
    App::new(collection, catalog, 60, Theme::default(), None)
}

fn market(id: &str, price: &str) -> MarketItem {
    MarketItem {
        identifier: id.to_string(),
        display_price: price.to_string(),
        contract: None,
        chain: "ethereum".to_string(),
    }
}

#[test]
fn default_view_is_full_catalog_ascending_by_id() {
    let app = new_app();
    let ids: Vec<u64> = app
        .visible_items()
        .iter()
        .map(|i| i.identifier.parse().unwrap())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(ids.len(), 40);
}

#[test]
fn returning_from_market_mode_restores_the_catalog() {
    let mut app = new_app();
    app.set_sort_option(SortOption::PriceAsc);
    let token = app.market_token();
    app.on_event(AppEvent::MarketData {
        token,
        sort: SortOption::PriceAsc,
        items: vec![market("3", "0.1000 ETH")],
    });
    assert_eq!(app.visible_items().len(), 1);

    app.set_sort_option(SortOption::TokenId);
    let items = app.visible_items();
    assert_eq!(items.len(), 40);
    assert_eq!(items[0].identifier, "1");
    assert!(items[0].display_price.is_none());
}

#[test]
fn market_response_with_duplicate_ids_reconciles_to_first_seen() {
    let mut app = new_app();
    app.set_sort_option(SortOption::BestOffer);
    let token = app.market_token();
    // Dedup happens in the action layer; the controller also tolerates a
    // duplicate slipping through by merging on identifier order as given.
    app.on_event(AppEvent::MarketData {
        token,
        sort: SortOption::BestOffer,
        items: seadeck::actions::dedup_by_identifier(vec![
            market("9", "Bid: 1.0000 WETH"),
            market("9", "Bid: 0.9000 WETH"),
            market("4", "Bid: 0.5000 WETH"),
        ]),
    });
    let items = app.visible_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].identifier, "9");
    assert_eq!(items[0].display_price.as_deref(), Some("Bid: 1.0000 WETH"));
}

#[test]
fn merged_items_carry_catalog_metadata() {
    let mut app = new_app();
    app.set_sort_option(SortOption::PriceAsc);
    let token = app.market_token();
    app.on_event(AppEvent::MarketData {
        token,
        sort: SortOption::PriceAsc,
        items: vec![market("1", "0.2000 ETH")],
    });
    let items = app.visible_items();
    assert_eq!(items.len(), 1);
    assert!(items[0].name.is_some());
    assert!(!items[0].attributes.is_empty());
    assert_eq!(items[0].display_price.as_deref(), Some("0.2000 ETH"));
}

#[test]
fn page_count_and_clamping() {
    let mut app = new_app();
    // 40 items, page size 25 -> 2 pages
    assert_eq!(app.total_pages(), 2);
    assert_eq!(app.page_items().len(), 25);

    app.last_page();
    assert_eq!(app.current_page(), 2);
    assert_eq!(app.page_items().len(), 15);

    // Out-of-range requests clamp instead of showing an empty page
    for _ in 0..5 {
        app.next_page();
    }
    assert_eq!(app.current_page(), 2);
}

#[test]
fn direction_toggle_is_an_exact_reversal() {
    let mut app = new_app();
    app.set_search("a");
    let forward: Vec<String> = app
        .visible_items()
        .iter()
        .map(|i| i.identifier.clone())
        .collect();

    app.toggle_direction();
    let backward: Vec<String> = app
        .visible_items()
        .iter()
        .map(|i| i.identifier.clone())
        .collect();

    assert_eq!(forward.len(), backward.len());
    let mut reversed = forward;
    reversed.reverse();
    assert_eq!(backward, reversed);
}

#[test]
fn search_matches_traits_case_insensitively() {
    let mut app = new_app();
    app.set_search("ROBOT");
    let items = app.visible_items();
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| {
        i.attributes
            .iter()
            .any(|t| t.value.eq_ignore_ascii_case("robot"))
            || i.name.as_deref().is_some_and(|n| n.to_lowercase().contains("robot"))
    }));
}

#[test]
fn trait_selection_is_conjunctive_across_categories() {
    let mut app = new_app();
    app.toggle_trait("Background".to_string(), "Lavender".to_string());
    app.toggle_trait("Body".to_string(), "Robot".to_string());

    let items = app.visible_items();
    assert!(!items.is_empty());
    for item in &items {
        assert!(item
            .attributes
            .iter()
            .any(|t| t.trait_type == "Background" && t.value == "Lavender"));
        assert!(item
            .attributes
            .iter()
            .any(|t| t.trait_type == "Body" && t.value == "Robot"));
    }

    // Adding a second value within a category widens the result
    let narrow = items.len();
    app.toggle_trait("Background".to_string(), "Sunset".to_string());
    assert!(app.visible_items().len() >= narrow);
}

#[test]
fn late_response_from_superseded_request_is_ignored() {
    let mut app = new_app();
    app.set_sort_option(SortOption::PriceAsc);
    let stale = app.market_token();
    app.set_sort_option(SortOption::LastSale);
    let fresh = app.market_token();

    app.on_event(AppEvent::MarketData {
        token: stale,
        sort: SortOption::PriceAsc,
        items: vec![market("1", "0.1000 ETH")],
    });
    assert!(app.market_loading(), "stale response must not end loading");

    app.on_event(AppEvent::MarketData {
        token: fresh,
        sort: SortOption::LastSale,
        items: vec![market("2", "Sold: 0.3000 ETH")],
    });
    assert!(!app.market_loading());
    assert_eq!(app.visible_items()[0].identifier, "2");
}
