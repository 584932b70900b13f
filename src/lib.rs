//! Seadeck - NFT collection storefront for the terminal
//!
//! Browse a collection's items, live market listings, offers and sale
//! history from the OpenSea v2 API in a ratatui interface.
//!
//! ## Architecture
//!
//! - [`opensea`] is the authenticated HTTP client with per-call cache hints.
//! - [`actions`] wraps every client call in a failure boundary and normalizes
//!   the market endpoints' response shapes into display records.
//! - [`catalog`] holds the bundled per-collection datasets.
//! - [`app`] is the browsing state controller: search, trait filters, sort,
//!   pagination and the merge of market data with catalog metadata.
//! - [`fetch`] runs the network calls on a background task, reporting back
//!   through token-tagged events.

pub mod actions;
pub mod app;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod opensea;
pub mod theme;
pub mod types;
pub mod ui;
pub mod util_text;

// Re-export commonly used types
pub use app::{App, InputMode, Tab, ViewShape};
pub use config::Config;
pub use types::{AppEvent, CatalogItem, DisplayItem, MarketItem, SortDirection, SortOption};
