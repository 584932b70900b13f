use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, InputMode, SidebarRow, Tab};
use crate::types::SortDirection;
use crate::util_text::{short_addr, truncate};

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &mut App) {
    app.tick_spinner();

    let search_expanded =
        app.input_mode() == InputMode::Search || !app.search_query().is_empty();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(4);
    constraints.push(Constraint::Length(1)); // header tabs
    if search_expanded {
        constraints.push(Constraint::Length(3)); // search box (only when in use)
    }
    constraints.push(Constraint::Min(0)); // body
    constraints.push(Constraint::Length(1)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app);
    idx += 1;
    if search_expanded {
        search_bar(f, chunks[idx], app);
        idx += 1;
    }
    body(f, chunks[idx], app);
    idx += 1;
    footer(f, chunks[idx], app);

    // Overlays render last
    if app.input_mode() == InputMode::SortMenu {
        draw_sort_menu(f, app);
    }
    if app.input_mode() == InputMode::Detail {
        draw_detail_overlay(f, app);
    }
    if app.toast_message().is_some() {
        draw_toast(f, app);
    }
}

// ===============================
// Header / Search
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.tab();
    let mut spans = Vec::new();

    for (i, tab) in Tab::ALL.iter().enumerate() {
        if i == 0 {
            spans.push(Span::raw("┌─"));
        } else {
            spans.push(Span::raw("┬─"));
        }
        if *tab == selected {
            spans.push(Span::styled(
                tab.title(),
                Style::default()
                    .fg(app.theme().focus_border)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(tab.title()));
        }
        spans.push(Span::raw("─"));
    }
    spans.push(Span::raw("┐"));
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        app.collection().display_name,
        Style::default().fg(app.theme().text_dim),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Plain),
    );
    f.render_widget(paragraph, area);
}

fn search_bar(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.input_mode() == InputMode::Search;
    let query = app.search_query();

    let border_color = if focused {
        app.theme().focus_border
    } else {
        app.theme().unfocused_border
    };
    let hint = "(Press / to search by name, id or trait)";
    let text = if query.is_empty() && !focused { hint } else { query };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(if focused {
            app.theme().focus_border
        } else {
            app.theme().text
        }))
        .block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color)),
        );
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        let x = area.x + 1 + (query.len().min((area.width.saturating_sub(2)) as usize) as u16);
        f.set_cursor_position((x, area.y + 1));
    }
}

// ===============================
// Body
// ===============================
fn body(f: &mut Frame, area: Rect, app: &mut App) {
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning_text = format!(
            "Terminal too small!\n\nMinimum size: {}×{}\nCurrent size: {}×{}",
            MIN_WIDTH, MIN_HEIGHT, area.width, area.height
        );
        let warning = Paragraph::new(warning_text)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(app.theme().toast_error)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Double));
        f.render_widget(warning, area);
        return;
    }

    match app.tab() {
        Tab::Items => items_tab(f, area, app),
        Tab::Dashboard => dashboard_tab(f, area, app),
        Tab::About => about_tab(f, area, app),
    }
}

fn items_tab(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(0)])
        .split(area);

    sidebar(f, chunks[0], app);
    grid(f, chunks[1], app);
}

fn sidebar(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.pane() == 0;
    let border_color = if focused {
        app.theme().focus_border
    } else {
        app.theme().unfocused_border
    };

    let rows = app.sidebar_rows();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| match row {
            SidebarRow::Category(name) => ListItem::new(Line::from(Span::styled(
                name.clone(),
                Style::default()
                    .fg(app.theme().text)
                    .add_modifier(Modifier::BOLD),
            ))),
            SidebarRow::Value { category, value } => {
                let mark = if app.is_trait_selected(category, value) { "[x]" } else { "[ ]" };
                ListItem::new(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(mark, Style::default().fg(app.theme().price)),
                    Span::raw(" "),
                    Span::styled(value.clone(), Style::default().fg(app.theme().text_dim)),
                ]))
            }
        })
        .collect();

    let mut state = ListState::default();
    if focused && !rows.is_empty() {
        state.select(Some(app.sidebar_cursor().min(rows.len() - 1)));
    }

    let selected_count: usize = app.selected_traits().values().map(|v| v.len()).sum();
    let title = if selected_count > 0 {
        format!(" Traits ({selected_count}) ")
    } else {
        " Traits ".to_string()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color)),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme().selection_bg)
                .fg(app.theme().selection_fg),
        );
    f.render_stateful_widget(list, area, &mut state);
}

fn grid(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.pane() == 1;
    let border_color = if focused {
        app.theme().focus_border
    } else {
        app.theme().unfocused_border
    };

    let total = app.visible_items().len();
    let page = app.current_page();
    let pages = app.total_pages();
    let title = format!(
        " {} items · page {page}/{pages} · sort: {}{} ",
        total,
        app.sort_option().label(),
        match app.sort_direction() {
            SortDirection::Asc => " ↑",
            SortDirection::Desc => " ↓",
        }
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    if app.market_loading() {
        let loading = Paragraph::new(format!("{} Fetching market data…", app.spinner_glyph()))
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme().text_dim))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    if app.market_empty() {
        let empty = Paragraph::new(
            "No listed items found.\n\nPress Esc to return to the default view.",
        )
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme().text_dim))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let glyph = app.view_shape().glyph();
    let page_items = app.page_items();
    let rows: Vec<ListItem> = page_items
        .iter()
        .map(|item| {
            let name = item.name.clone().unwrap_or_else(|| format!("#{}", item.identifier));
            let mut spans = vec![
                Span::styled(format!("{glyph} "), Style::default().fg(app.theme().text_dim)),
                Span::styled(
                    format!("{:>5} ", item.identifier),
                    Style::default().fg(app.theme().text_dim),
                ),
                Span::styled(format!("{:<24}", truncate(&name, 24)), Style::default().fg(app.theme().text)),
            ];
            if let Some(price) = &item.display_price {
                spans.push(Span::styled(
                    format!(" {price}"),
                    Style::default().fg(app.theme().price),
                ));
            } else {
                let traits = item
                    .attributes
                    .iter()
                    .map(|t| t.value.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                spans.push(Span::styled(
                    format!(" {}", truncate(&traits, 40)),
                    Style::default().fg(app.theme().text_dim),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    if focused && !page_items.is_empty() {
        state.select(Some(app.sel_item().min(page_items.len() - 1)));
    }

    let list = List::new(rows).block(block).highlight_style(
        Style::default()
            .bg(app.theme().selection_bg)
            .fg(app.theme().selection_fg),
    );
    f.render_stateful_widget(list, area, &mut state);
}

fn dashboard_tab(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Collection Stats ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme().unfocused_border));

    let Some(stats) = app.stats() else {
        let waiting = Paragraph::new(format!("{} Loading stats…", app.spinner_glyph()))
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme().text_dim))
            .block(block);
        f.render_widget(waiting, area);
        return;
    };

    let symbol = stats.floor_price_symbol.as_deref().unwrap_or("ETH");
    let floor_line = if stats.floor_price > 0.0 {
        format!("Floor Price     {:.4} {symbol}", stats.floor_price)
    } else {
        "Floor Price     0 or hidden by the marketplace".to_string()
    };

    let lines = vec![
        Line::raw(floor_line),
        Line::raw(format!("Total Volume    {:.2} {symbol}", stats.volume)),
        Line::raw(format!("Sales           {}", stats.sales)),
        Line::raw(format!("Owners          {}", stats.num_owners)),
        Line::raw(format!("Market Cap      {:.2} {symbol}", stats.market_cap)),
        Line::raw(format!("Average Price   {:.4} {symbol}", stats.average_price)),
    ];

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(app.theme().text))
        .block(block);
    f.render_widget(paragraph, area);
}

fn about_tab(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" About ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme().unfocused_border));

    let Some(meta) = app.meta() else {
        let waiting = Paragraph::new(format!("{} Loading collection profile…", app.spinner_glyph()))
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme().text_dim))
            .block(block);
        f.render_widget(waiting, area);
        return;
    };

    let mut lines = Vec::new();
    if let Some(name) = &meta.name {
        lines.push(Line::from(Span::styled(
            name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::raw(""));
    }
    if let Some(desc) = &meta.description {
        lines.push(Line::raw(desc.clone()));
        lines.push(Line::raw(""));
    }
    if let Some(supply) = meta.total_supply {
        lines.push(Line::raw(format!("Supply   {supply}")));
    }
    if let Some(owner) = &meta.owner {
        lines.push(Line::raw(format!("Owner    {}", short_addr(owner))));
    }
    if let Some(url) = &meta.project_url {
        lines.push(Line::raw(format!("Web      {url}")));
    }
    if let Some(tw) = &meta.twitter_username {
        lines.push(Line::raw(format!("Twitter  @{tw}")));
    }
    if let Some(dc) = &meta.discord_url {
        lines.push(Line::raw(format!("Discord  {dc}")));
    }

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(app.theme().text))
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(paragraph, area);
}

// ===============================
// Footer
// ===============================
fn footer(f: &mut Frame, area: Rect, app: &App) {
    let keys = match app.input_mode() {
        InputMode::Search => "type to search · Enter apply · Esc clear",
        InputMode::SortMenu => "↑↓ choose · Enter apply · d direction · Esc close",
        InputMode::Detail => "↑↓ scroll history · Esc close",
        InputMode::Normal => {
            "q quit · Tab pane · t tab · / search · s sort · d direction · v shape · ←→ page · Enter open"
        }
    };
    let line = Line::from(vec![Span::styled(keys, Style::default().fg(app.theme().text_dim))]);
    f.render_widget(Paragraph::new(line), area);
}

// ===============================
// Overlays
// ===============================
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let v = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(height),
        Constraint::Min(0),
    ])
    .split(area);
    let h = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(width),
        Constraint::Min(0),
    ])
    .split(v[1]);
    h[1]
}

fn draw_sort_menu(f: &mut Frame, app: &App) {
    use crate::types::SortOption;

    let area = centered_rect(36, (SortOption::ALL.len() + 3) as u16, f.area());
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = SortOption::ALL
        .iter()
        .map(|opt| {
            let marker = if *opt == app.sort_option() { "● " } else { "○ " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(app.theme().price)),
                Span::raw(opt.label()),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.sort_cursor()));

    let dir = match app.sort_direction() {
        SortDirection::Asc => "ascending",
        SortDirection::Desc => "descending",
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Sort by ")
                .title_bottom(Line::from(format!(" {dir} ")).right_aligned())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme().focus_border)),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme().selection_bg)
                .fg(app.theme().selection_fg),
        );
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_detail_overlay(f: &mut Frame, app: &App) {
    let Some(item) = app.detail_item() else { return };

    let area = centered_rect(
        f.area().width.saturating_sub(10).min(70),
        f.area().height.saturating_sub(4).min(24),
        f.area(),
    );
    f.render_widget(Clear, area);

    let name = item.name.clone().unwrap_or_else(|| format!("#{}", item.identifier));
    let mut lines = vec![Line::from(Span::styled(
        format!("{name}  (id {})", item.identifier),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if let Some(price) = &item.display_price {
        lines.push(Line::from(Span::styled(
            price.clone(),
            Style::default().fg(app.theme().price),
        )));
    }
    if let Some(contract) = &item.contract {
        lines.push(Line::raw(format!("contract {}", short_addr(contract))));
    }
    let market = app.detail_market();
    if let Some(listing) = &market.listing {
        lines.push(Line::from(vec![
            Span::styled("Listed   ", Style::default().fg(app.theme().text_dim)),
            Span::styled(listing.clone(), Style::default().fg(app.theme().price)),
        ]));
    }
    if let Some(offer) = &market.top_offer {
        lines.push(Line::from(vec![
            Span::styled("Top bid  ", Style::default().fg(app.theme().text_dim)),
            Span::styled(offer.clone(), Style::default().fg(app.theme().price)),
        ]));
    }
    if let Some(owner) = &market.owner {
        lines.push(Line::raw(format!("Owner    {}", short_addr(owner))));
    }
    if let Some(image) = &item.image_url {
        lines.push(Line::from(Span::styled(
            image.clone(),
            Style::default().fg(app.theme().text_dim),
        )));
    }
    lines.push(Line::raw(""));

    for t in &item.attributes {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<12}", t.trait_type),
                Style::default().fg(app.theme().text_dim),
            ),
            Span::raw(t.value.clone()),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "History",
        Style::default().add_modifier(Modifier::BOLD),
    )));

    if app.history_loading() {
        lines.push(Line::from(Span::styled(
            format!("{} loading…", app.spinner_glyph()),
            Style::default().fg(app.theme().text_dim),
        )));
    } else if app.history().is_empty() {
        lines.push(Line::from(Span::styled(
            "no recorded events",
            Style::default().fg(app.theme().text_dim),
        )));
    } else {
        for ev in app.history() {
            let mut spans = vec![Span::styled(
                format!("{:<10}", ev.event_type),
                Style::default().fg(app.theme().price),
            )];
            if let Some(price) = &ev.price_label {
                spans.push(Span::raw(format!("{price}  ")));
            }
            if let Some(from) = &ev.from {
                spans.push(Span::styled(
                    format!("{} ", short_addr(from)),
                    Style::default().fg(app.theme().text_dim),
                ));
            }
            if let Some(to) = &ev.to {
                spans.push(Span::styled(
                    format!("→ {} ", short_addr(to)),
                    Style::default().fg(app.theme().text_dim),
                ));
            }
            spans.push(Span::styled(
                ev.when.clone(),
                Style::default().fg(app.theme().text_dim),
            ));
            lines.push(Line::from(spans));
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Item ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(app.theme().focus_border)),
        );
    f.render_widget(paragraph, area);
}

fn draw_toast(f: &mut Frame, app: &App) {
    let Some(msg) = app.toast_message() else { return };
    let width = (msg.len() as u16 + 4).min(f.area().width);
    let area = centered_rect(width, 3, f.area());
    f.render_widget(Clear, area);

    let toast = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme().toast_success))
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(toast, area);
}
