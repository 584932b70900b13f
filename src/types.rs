use serde::{Deserialize, Serialize};

/// One trait on a catalog item, e.g. `{trait_type: "Background", value: "Red"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitAttribute {
    pub trait_type: String,
    pub value: String,
}

/// An item from the bundled per-collection dataset. Immutable for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub identifier: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub attributes: Vec<TraitAttribute>,
}

/// A normalized market entry from one of the collection-wide endpoints.
/// Carries price but no metadata; merged with the catalog by identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketItem {
    pub identifier: String,
    pub display_price: String,
    pub contract: Option<String>,
    pub chain: String,
}

/// Catalog fields with market fields layered on top when a market sort mode
/// is active. Keyed by identifier (assumed unique within a collection).
#[derive(Debug, Clone)]
pub struct DisplayItem {
    pub identifier: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub attributes: Vec<TraitAttribute>,
    pub display_price: Option<String>,
    pub contract: Option<String>,
    pub chain: Option<String>,
}

impl DisplayItem {
    pub fn from_catalog(item: &CatalogItem) -> Self {
        Self {
            identifier: item.identifier.clone(),
            name: item.name.clone(),
            image_url: item.image_url.clone(),
            attributes: item.attributes.clone(),
            display_price: None,
            contract: None,
            chain: None,
        }
    }

    /// Merge a market entry with its catalog counterpart. The catalog supplies
    /// name/image/traits; the market entry supplies price/contract/chain.
    pub fn from_market(market: &MarketItem, catalog: Option<&CatalogItem>) -> Self {
        Self {
            identifier: market.identifier.clone(),
            name: catalog.and_then(|c| c.name.clone()),
            image_url: catalog.and_then(|c| c.image_url.clone()),
            attributes: catalog.map(|c| c.attributes.clone()).unwrap_or_default(),
            display_price: Some(market.display_price.clone()),
            contract: market.contract.clone(),
            chain: Some(market.chain.clone()),
        }
    }
}

/// Sort modes offered by the sort menu. TokenId is the local default; the
/// other three are market-driven and trigger a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOption {
    TokenId,
    PriceAsc,
    LastSale,
    BestOffer,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::TokenId,
        SortOption::PriceAsc,
        SortOption::LastSale,
        SortOption::BestOffer,
    ];

    pub fn is_market(&self) -> bool {
        !matches!(self, SortOption::TokenId)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::TokenId => "Token ID",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::LastSale => "Last Sale",
            SortOption::BestOffer => "Best Offer",
        }
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOption::TokenId => write!(f, "token-id"),
            SortOption::PriceAsc => write!(f, "price_asc"),
            SortOption::LastSale => write!(f, "last-sale"),
            SortOption::BestOffer => write!(f, "best-offer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Collection market statistics shown on the Dashboard tab. Serde view of the
/// `total` object inside the OpenSea stats response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    #[serde(default)]
    pub floor_price: f64,
    #[serde(default)]
    pub floor_price_symbol: Option<String>,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub sales: u64,
    #[serde(default)]
    pub num_owners: u64,
    #[serde(default)]
    pub market_cap: f64,
    #[serde(default)]
    pub average_price: f64,
}

/// Collection profile shown on the About tab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub banner_image_url: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub total_supply: Option<u64>,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub discord_url: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
}

/// Live market context for one item, shown alongside its history in the
/// detail overlay. Every field degrades to None independently.
#[derive(Debug, Clone, Default)]
pub struct ItemMarketContext {
    pub listing: Option<String>,
    pub top_offer: Option<String>,
    pub owner: Option<String>,
}

/// One row of an item's event history (detail overlay).
#[derive(Debug, Clone)]
pub struct AssetEvent {
    pub event_type: String,
    pub price_label: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub when: String,
}

/// Requests handed to the background fetch task. Market and history requests
/// carry the monotonically increasing token used to discard stale responses.
#[derive(Debug, Clone)]
pub enum FetchRequest {
    MarketData { token: u64, sort: SortOption },
    ItemHistory { token: u64, identifier: String },
    CollectionInfo,
}

/// Events delivered back to the UI loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    MarketData {
        token: u64,
        sort: SortOption,
        items: Vec<MarketItem>,
    },
    ItemHistory {
        token: u64,
        identifier: String,
        events: Vec<AssetEvent>,
        market: ItemMarketContext,
    },
    CollectionInfo {
        stats: Option<CollectionStats>,
        meta: Option<CollectionMeta>,
    },
    Quit,
}
