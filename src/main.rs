use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;

use seadeck::app::{App, InputMode, Tab};
use seadeck::types::{AppEvent, FetchRequest};
use seadeck::{catalog, config, fetch, ui};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    dotenvy::dotenv().ok();

    // Logging goes to a file; stdout belongs to the TUI
    init_logging();

    let cfg = config::load().context("Failed to load configuration")?;

    let collection = catalog::collection_or_default(&cfg.slug);
    if collection.slug != cfg.slug {
        log::warn!("unknown collection '{}', using '{}'", cfg.slug, collection.slug);
    }
    let items = catalog::load_catalog(&collection).context("Failed to load bundled catalog")?;

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // app + channels
    let (event_tx, event_rx) = unbounded_channel::<AppEvent>();
    let (request_tx, request_rx) = unbounded_channel::<FetchRequest>();

    let fetch_task: JoinHandle<Result<()>> = {
        let cfg = cfg.clone();
        tokio::spawn(async move { fetch::run_fetch(cfg, collection, request_rx, event_tx).await })
    };

    let mut app = App::new(
        collection,
        items,
        cfg.market_cache_secs,
        cfg.theme,
        Some(request_tx),
    );

    let result = run_loop(&mut app, &mut terminal, event_rx, cfg.render_fps).await;

    // cleanup
    fetch_task.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

fn init_logging() {
    let log_path = std::env::var("SEADECK_LOG_FILE").unwrap_or_else(|_| "seadeck.log".into());
    if let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
    }
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
    fps: u32,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(fps.max(1)) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k);
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, k: KeyEvent) {
    // Search input captures typing
    if app.input_mode() == InputMode::Search {
        match k.code {
            KeyCode::Char(c) => app.search_add_char(c),
            KeyCode::Backspace => app.search_backspace(),
            KeyCode::Enter => app.close_search(),
            KeyCode::Esc => app.clear_search(),
            _ => {}
        }
        return;
    }

    // Sort menu overlay
    if app.input_mode() == InputMode::SortMenu {
        match k.code {
            KeyCode::Up => app.sort_menu_up(),
            KeyCode::Down => app.sort_menu_down(),
            KeyCode::Enter => app.sort_menu_choose(),
            KeyCode::Char('d') => app.toggle_direction(),
            KeyCode::Esc => app.close_sort_menu(),
            _ => {}
        }
        return;
    }

    // Item detail overlay
    if app.input_mode() == InputMode::Detail {
        if matches!(k.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.close_detail();
        }
        return;
    }

    // Normal mode
    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.on_event(AppEvent::Quit);
        }

        (KeyCode::Tab, _) => app.next_pane(),
        (KeyCode::Char('t'), _) => app.next_tab(),
        (KeyCode::Char('1'), _) => app.set_tab(Tab::Items),
        (KeyCode::Char('2'), _) => app.set_tab(Tab::Dashboard),
        (KeyCode::Char('3'), _) => app.set_tab(Tab::About),

        (KeyCode::Up, _) => {
            if app.pane() == 0 {
                app.sidebar_up();
            } else {
                app.grid_up();
            }
        }
        (KeyCode::Down, _) => {
            if app.pane() == 0 {
                app.sidebar_down();
            } else {
                app.grid_down();
            }
        }
        (KeyCode::Left, _) | (KeyCode::PageUp, _) => app.prev_page(),
        (KeyCode::Right, _) | (KeyCode::PageDown, _) => app.next_page(),
        (KeyCode::Home, _) => app.first_page(),
        (KeyCode::End, _) => app.last_page(),

        (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => {
            if app.pane() == 0 {
                app.sidebar_toggle();
            } else {
                app.open_selected_item();
            }
        }

        (KeyCode::Char('/'), _) | (KeyCode::Char('f'), _) => app.start_search(),
        (KeyCode::Char('s'), _) => app.open_sort_menu(),
        (KeyCode::Char('d'), _) => app.toggle_direction(),
        (KeyCode::Char('v'), _) => app.toggle_view_shape(),
        (KeyCode::Char('x'), _) => {
            app.clear_traits();
            app.show_toast("Trait filters cleared".to_string());
        }
        (KeyCode::Esc, _) => {
            // Escape hatch from the market empty state; otherwise clears search
            if app.market_empty() {
                app.reset_to_default_view();
            } else {
                app.clear_search();
            }
        }
        _ => {}
    }
}
