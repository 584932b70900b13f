//! The browsing state controller.
//!
//! Reconciles three sources into the page of items to render: the bundled
//! catalog, live market data, and the user's search/filter/sort choices. All
//! state is ephemeral for the session; market fetches run on a background
//! task and report back through [`AppEvent`]s tagged with request tokens so
//! that late responses from superseded requests are discarded.

use crate::catalog::{self, Collection};
use crate::config::ITEMS_PER_PAGE;
use crate::filter::{matches_search, matches_search_fields, matches_traits, TraitSelection};
use crate::theme::{ColorScheme, Theme};
use crate::types::{
    AppEvent, AssetEvent, CatalogItem, CollectionMeta, CollectionStats, DisplayItem, FetchRequest,
    ItemMarketContext, MarketItem, SortDirection, SortOption,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tab {
    Items,
    Dashboard,
    About,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Items, Tab::Dashboard, Tab::About];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Items => "Items",
            Tab::Dashboard => "Dashboard",
            Tab::About => "About",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    SortMenu,
    Detail,
}

/// Grid cell shape toggle (square vs round avatars in the web storefront).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViewShape {
    Square,
    Round,
}

impl ViewShape {
    pub fn toggled(&self) -> Self {
        match self {
            ViewShape::Square => ViewShape::Round,
            ViewShape::Round => ViewShape::Square,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ViewShape::Square => "■",
            ViewShape::Round => "●",
        }
    }
}

/// One row the sidebar can point at: a category header or a value line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarRow {
    Category(String),
    Value { category: String, value: String },
}

pub struct App {
    quit: bool,
    tab: Tab,
    input_mode: InputMode,
    pane: usize, // 0 = trait sidebar, 1 = item grid

    collection: Collection,
    catalog: Vec<CatalogItem>,
    catalog_index: HashMap<String, usize>,
    traits: std::collections::BTreeMap<String, Vec<String>>,

    // Toolbar state
    search_query: String,
    view_shape: ViewShape,

    // Sort state
    sort_option: SortOption,
    sort_direction: SortDirection,
    sort_cursor: usize,

    // Trait filter state
    selected_traits: TraitSelection,
    sidebar_cursor: usize,

    // Pagination / grid selection
    page: usize, // 1-based
    sel_item: usize,

    // Market data state
    market_items: Option<Vec<MarketItem>>,
    market_loading: bool,
    market_cache: HashMap<SortOption, (Instant, Vec<MarketItem>)>,
    market_cache_ttl: Duration,

    // Request sequencing: responses with a token older than the latest
    // issued for their kind are discarded (last request wins, not last
    // response).
    next_token: u64,
    latest_market_token: u64,
    latest_history_token: u64,

    // Item detail overlay
    detail_item: Option<DisplayItem>,
    detail_market: ItemMarketContext,
    history: Vec<AssetEvent>,
    history_loading: bool,

    // Dashboard / About
    stats: Option<CollectionStats>,
    meta: Option<CollectionMeta>,
    info_requested: bool,

    fetch_tx: Option<UnboundedSender<FetchRequest>>,

    theme: ColorScheme,
    toast_message: Option<(String, Instant)>,
    spinner_frame: usize,
}

impl App {
    pub fn new(
        collection: Collection,
        catalog: Vec<CatalogItem>,
        market_cache_secs: u64,
        theme: Theme,
        fetch_tx: Option<UnboundedSender<FetchRequest>>,
    ) -> Self {
        let catalog_index = catalog
            .iter()
            .enumerate()
            .map(|(i, item)| (item.identifier.clone(), i))
            .collect();
        let traits = catalog::available_traits(&catalog);

        Self {
            quit: false,
            tab: Tab::Items,
            input_mode: InputMode::Normal,
            pane: 1,
            collection,
            catalog,
            catalog_index,
            traits,
            search_query: String::new(),
            view_shape: ViewShape::Square,
            sort_option: SortOption::TokenId,
            sort_direction: SortDirection::Asc,
            sort_cursor: 0,
            selected_traits: TraitSelection::new(),
            sidebar_cursor: 0,
            page: 1,
            sel_item: 0,
            market_items: None,
            market_loading: false,
            market_cache: HashMap::new(),
            market_cache_ttl: Duration::from_secs(market_cache_secs),
            next_token: 0,
            latest_market_token: 0,
            latest_history_token: 0,
            detail_item: None,
            detail_market: ItemMarketContext::default(),
            history: Vec::new(),
            history_loading: false,
            stats: None,
            meta: None,
            info_requested: false,
            fetch_tx,
            theme: theme.colors(),
            toast_message: None,
            spinner_frame: 0,
        }
    }

    // ----- getters -----
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn tab(&self) -> Tab { self.tab }
    pub fn input_mode(&self) -> InputMode { self.input_mode }
    pub fn pane(&self) -> usize { self.pane }
    pub fn collection(&self) -> &Collection { &self.collection }
    pub fn search_query(&self) -> &str { &self.search_query }
    pub fn view_shape(&self) -> ViewShape { self.view_shape }
    pub fn sort_option(&self) -> SortOption { self.sort_option }
    pub fn sort_direction(&self) -> SortDirection { self.sort_direction }
    pub fn sort_cursor(&self) -> usize { self.sort_cursor }
    pub fn selected_traits(&self) -> &TraitSelection { &self.selected_traits }
    pub fn sidebar_cursor(&self) -> usize { self.sidebar_cursor }
    pub fn market_loading(&self) -> bool { self.market_loading }
    pub fn detail_item(&self) -> Option<&DisplayItem> { self.detail_item.as_ref() }
    pub fn detail_market(&self) -> &ItemMarketContext { &self.detail_market }
    pub fn history(&self) -> &[AssetEvent] { &self.history }
    pub fn history_loading(&self) -> bool { self.history_loading }
    pub fn stats(&self) -> Option<&CollectionStats> { self.stats.as_ref() }
    pub fn meta(&self) -> Option<&CollectionMeta> { self.meta.as_ref() }
    pub fn theme(&self) -> &ColorScheme { &self.theme }
    pub fn sel_item(&self) -> usize { self.sel_item }

    /// Latest token issued for a market fetch (stale responses carry an
    /// older one).
    pub fn market_token(&self) -> u64 { self.latest_market_token }
    pub fn history_token(&self) -> u64 { self.latest_history_token }

    fn alloc_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    // ----- derived item lists -----

    /// The reconciled, filtered, direction-adjusted item list (pre-pagination).
    ///
    /// Local mode: full catalog sorted ascending by numeric identifier, then
    /// search and trait filters. Market mode: the action's returned order,
    /// merged with catalog metadata, then search only. Direction is a final
    /// reversal of whatever order the mode produced.
    pub fn visible_items(&self) -> Vec<DisplayItem> {
        let mut items: Vec<DisplayItem> = if self.sort_option.is_market() {
            let market = self.market_items.as_deref().unwrap_or(&[]);
            market
                .iter()
                .map(|m| {
                    let catalog = self
                        .catalog_index
                        .get(&m.identifier)
                        .and_then(|&i| self.catalog.get(i));
                    DisplayItem::from_market(m, catalog)
                })
                .filter(|item| {
                    matches_search_fields(
                        item.name.as_deref(),
                        &item.identifier,
                        &item.attributes,
                        &self.search_query,
                    )
                })
                .collect()
        } else {
            let mut sorted: Vec<&CatalogItem> = self.catalog.iter().collect();
            sorted.sort_by_key(|item| item.identifier.parse::<u64>().unwrap_or(u64::MAX));
            sorted
                .into_iter()
                .filter(|item| matches_search(item, &self.search_query))
                .filter(|item| matches_traits(item, &self.selected_traits))
                .map(DisplayItem::from_catalog)
                .collect()
        };

        if self.sort_direction == SortDirection::Desc {
            items.reverse();
        }
        items
    }

    pub fn total_pages(&self) -> usize {
        let len = self.visible_items().len();
        std::cmp::max(1, len.div_ceil(ITEMS_PER_PAGE))
    }

    /// Current page clamped to the valid range; the stored page is left
    /// untouched so shrinking filters do not lose the user's place for good.
    pub fn current_page(&self) -> usize {
        std::cmp::min(self.page, self.total_pages())
    }

    /// The slice of items for the current page.
    pub fn page_items(&self) -> Vec<DisplayItem> {
        let items = self.visible_items();
        let start = (self.current_page() - 1) * ITEMS_PER_PAGE;
        items.into_iter().skip(start).take(ITEMS_PER_PAGE).collect()
    }

    /// True when a market mode is active, the fetch finished, and nothing
    /// came back: the grid shows the empty state with an escape hatch.
    pub fn market_empty(&self) -> bool {
        self.sort_option.is_market()
            && !self.market_loading
            && self.market_items.as_ref().is_some_and(|m| m.is_empty())
    }

    // ----- events from the fetch task -----
    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::MarketData { token, sort, items } => {
                if token != self.latest_market_token || sort != self.sort_option {
                    log::debug!("[app] dropping stale market response (token {token}, sort {sort})");
                    return;
                }
                self.market_loading = false;
                self.market_cache.insert(sort, (Instant::now(), items.clone()));
                self.market_items = Some(items);
                self.clamp_selection();
            }
            AppEvent::ItemHistory { token, identifier, events, market } => {
                if token != self.latest_history_token {
                    log::debug!("[app] dropping stale history response for {identifier}");
                    return;
                }
                let still_open = self
                    .detail_item
                    .as_ref()
                    .is_some_and(|d| d.identifier == identifier);
                if still_open {
                    self.history = events;
                    self.detail_market = market;
                    self.history_loading = false;
                }
            }
            AppEvent::CollectionInfo { stats, meta } => {
                self.stats = stats;
                self.meta = meta;
            }
            AppEvent::Quit => self.quit = true,
        }
    }

    // ----- sort -----

    /// Apply a sort option. Market modes are served from the per-mode cache
    /// when the entry is still fresh, otherwise a token-tagged fetch is
    /// issued and the loading state shown. Direction resets to ascending.
    pub fn set_sort_option(&mut self, option: SortOption) {
        self.sort_option = option;
        self.sort_direction = SortDirection::Asc;
        self.page = 1;
        self.sel_item = 0;

        if !option.is_market() {
            self.market_items = None;
            self.market_loading = false;
            return;
        }

        if let Some((stored, items)) = self.market_cache.get(&option) {
            if stored.elapsed() < self.market_cache_ttl {
                log::debug!("[app] market cache hit for {option}");
                self.market_items = Some(items.clone());
                self.market_loading = false;
                return;
            }
        }

        let token = self.alloc_token();
        self.latest_market_token = token;
        self.market_items = None;
        self.market_loading = true;
        if let Some(tx) = &self.fetch_tx {
            let _ = tx.send(FetchRequest::MarketData { token, sort: option });
        }
    }

    pub fn toggle_direction(&mut self) {
        self.sort_direction = self.sort_direction.toggled();
        self.page = 1;
        self.sel_item = 0;
    }

    /// Escape hatch from the market empty state back to the default view.
    pub fn reset_to_default_view(&mut self) {
        self.set_sort_option(SortOption::TokenId);
    }

    pub fn open_sort_menu(&mut self) {
        self.sort_cursor = SortOption::ALL
            .iter()
            .position(|o| *o == self.sort_option)
            .unwrap_or(0);
        self.input_mode = InputMode::SortMenu;
    }

    pub fn close_sort_menu(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn sort_menu_up(&mut self) {
        self.sort_cursor = self.sort_cursor.saturating_sub(1);
    }

    pub fn sort_menu_down(&mut self) {
        self.sort_cursor = std::cmp::min(self.sort_cursor + 1, SortOption::ALL.len() - 1);
    }

    pub fn sort_menu_choose(&mut self) {
        let option = SortOption::ALL[self.sort_cursor];
        self.input_mode = InputMode::Normal;
        self.set_sort_option(option);
    }

    // ----- search -----
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn search_add_char(&mut self, ch: char) {
        self.search_query.push(ch);
        self.page = 1;
        self.sel_item = 0;
    }

    pub fn search_backspace(&mut self) {
        self.search_query.pop();
        self.page = 1;
        self.sel_item = 0;
    }

    pub fn close_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.input_mode = InputMode::Normal;
        self.page = 1;
        self.sel_item = 0;
    }

    /// Test/driver convenience: replace the whole query at once.
    pub fn set_search(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.page = 1;
        self.sel_item = 0;
    }

    // ----- trait filters -----

    /// Sidebar rows in display order: category headers with their values.
    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for (category, values) in &self.traits {
            rows.push(SidebarRow::Category(category.clone()));
            for value in values {
                rows.push(SidebarRow::Value {
                    category: category.clone(),
                    value: value.clone(),
                });
            }
        }
        rows
    }

    pub fn sidebar_up(&mut self) {
        self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1);
    }

    pub fn sidebar_down(&mut self) {
        let max = self.sidebar_rows().len().saturating_sub(1);
        self.sidebar_cursor = std::cmp::min(self.sidebar_cursor + 1, max);
    }

    /// Toggle the trait value under the sidebar cursor.
    pub fn sidebar_toggle(&mut self) {
        let rows = self.sidebar_rows();
        if let Some(SidebarRow::Value { category, value }) = rows.get(self.sidebar_cursor) {
            self.toggle_trait(category.clone(), value.clone());
        }
    }

    pub fn toggle_trait(&mut self, category: String, value: String) {
        let values = self.selected_traits.entry(category.clone()).or_default();
        if let Some(pos) = values.iter().position(|v| *v == value) {
            values.remove(pos);
        } else {
            values.push(value);
        }
        if self.selected_traits.get(&category).is_some_and(|v| v.is_empty()) {
            self.selected_traits.remove(&category);
        }
        self.page = 1;
        self.sel_item = 0;
    }

    pub fn clear_traits(&mut self) {
        self.selected_traits.clear();
        self.page = 1;
        self.sel_item = 0;
    }

    pub fn is_trait_selected(&self, category: &str, value: &str) -> bool {
        self.selected_traits
            .get(category)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }

    // ----- grid navigation / pagination -----
    pub fn grid_up(&mut self) {
        self.sel_item = self.sel_item.saturating_sub(1);
    }

    pub fn grid_down(&mut self) {
        let max = self.page_items().len().saturating_sub(1);
        self.sel_item = std::cmp::min(self.sel_item + 1, max);
    }

    pub fn next_page(&mut self) {
        let total = self.total_pages();
        self.page = std::cmp::min(self.current_page() + 1, total);
        self.sel_item = 0;
    }

    pub fn prev_page(&mut self) {
        self.page = self.current_page().saturating_sub(1).max(1);
        self.sel_item = 0;
    }

    pub fn first_page(&mut self) {
        self.page = 1;
        self.sel_item = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.total_pages();
        self.sel_item = 0;
    }

    fn clamp_selection(&mut self) {
        let max = self.page_items().len().saturating_sub(1);
        self.sel_item = std::cmp::min(self.sel_item, max);
    }

    pub fn next_pane(&mut self) {
        self.pane = (self.pane + 1) % 2;
    }

    pub fn toggle_view_shape(&mut self) {
        self.view_shape = self.view_shape.toggled();
    }

    // ----- item detail overlay -----

    /// Open the item under the grid cursor and kick off its history fetch.
    /// History is cleared and reloaded on every open; a failed fetch leaves
    /// it empty without blocking the overlay.
    pub fn open_selected_item(&mut self) {
        let items = self.page_items();
        let Some(item) = items.get(self.sel_item).cloned() else {
            return;
        };
        let identifier = item.identifier.clone();
        self.detail_item = Some(item);
        self.detail_market = ItemMarketContext::default();
        self.history.clear();
        self.history_loading = true;
        self.input_mode = InputMode::Detail;

        let token = self.alloc_token();
        self.latest_history_token = token;
        if let Some(tx) = &self.fetch_tx {
            let _ = tx.send(FetchRequest::ItemHistory { token, identifier });
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_item = None;
        self.detail_market = ItemMarketContext::default();
        self.history.clear();
        self.history_loading = false;
        self.input_mode = InputMode::Normal;
    }

    // ----- tabs / collection info -----
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if tab != Tab::Items {
            self.request_collection_info();
        }
    }

    pub fn next_tab(&mut self) {
        let idx = Tab::ALL.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.set_tab(Tab::ALL[(idx + 1) % Tab::ALL.len()]);
    }

    /// Stats and metadata are fetched once per session, on first visit to a
    /// non-Items tab.
    fn request_collection_info(&mut self) {
        if self.info_requested {
            return;
        }
        self.info_requested = true;
        if let Some(tx) = &self.fetch_tx {
            let _ = tx.send(FetchRequest::CollectionInfo);
        }
    }

    // ----- toast / spinner -----
    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    pub fn toast_message(&self) -> Option<&str> {
        const TOAST_DURATION: Duration = Duration::from_secs(2);
        self.toast_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < TOAST_DURATION {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn spinner_glyph(&self) -> &'static str {
        const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
        FRAMES[self.spinner_frame % FRAMES.len()]
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }
}
