use anyhow::{anyhow, Result};
use clap::Parser;
use std::env;

use crate::catalog;
use crate::theme::Theme;

/// Seadeck - terminal storefront for NFT collections
///
/// Browse a collection's items, market listings, offers and sales from the
/// OpenSea v2 API in a terminal UI.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "seadeck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "NFT collection storefront in the terminal", long_about = None)]
pub struct CliArgs {
    /// Collection slug to browse (e.g. "parodee-pixel-chaos")
    #[arg(short, long, env = "SEADECK_SLUG")]
    pub slug: Option<String>,

    /// OpenSea API key (requests are attempted without it, but will fail)
    #[arg(long, env = "OPENSEA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenSea API base URL
    #[arg(long, env = "OPENSEA_API_URL")]
    pub api_url: Option<String>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// Market response cache lifetime in seconds (0 disables caching)
    #[arg(long, env = "MARKET_CACHE_SECS")]
    pub market_cache_secs: Option<u64>,

    /// Max entries requested from the collection-wide market endpoints (1-100)
    #[arg(long, env = "MARKET_LIMIT")]
    pub market_limit: Option<u32>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Color theme: nord, dos-blue, amber-crt
    #[arg(long, env = "SEADECK_THEME")]
    pub theme: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub slug: String,
    pub api_key: Option<String>,
    pub api_url: String,
    pub http_timeout_ms: u64,
    pub market_cache_secs: u64,
    pub market_limit: u32,
    pub render_fps: u32,
    pub theme: Theme,
}

/// Page size of the item grid. Fixed, matching the storefront layout.
pub const ITEMS_PER_PAGE: usize = 25;

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic scheme check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    let args = CliArgs::parse();
    load_from(args)
}

fn load_from(args: CliArgs) -> Result<Config> {
    let slug = args
        .slug
        .or_else(|| env::var("SEADECK_SLUG").ok())
        .unwrap_or_else(|| catalog::default_slug().to_string());

    let api_url = args
        .api_url
        .or_else(|| env::var("OPENSEA_API_URL").ok())
        .unwrap_or_else(|| "https://api.opensea.io/api/v2".to_string());
    validate_url(&api_url, "OPENSEA_API_URL")?;

    let api_key = args.api_key.or_else(|| env::var("OPENSEA_API_KEY").ok());
    if api_key.is_none() {
        // Requests are still attempted; they will fail at the HTTP layer.
        log::warn!("Missing OpenSea API key. Requests might fail if not proxied.");
    }

    let http_timeout_ms = args
        .http_timeout_ms
        .or_else(|| env::var("HTTP_TIMEOUT_MS").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(8000);
    let http_timeout_ms = validate_in_range(http_timeout_ms, 1000, 60000, "HTTP_TIMEOUT_MS")?;

    let market_cache_secs = args
        .market_cache_secs
        .or_else(|| {
            env::var("MARKET_CACHE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(60);

    let market_limit = args
        .market_limit
        .or_else(|| env::var("MARKET_LIMIT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(50);
    let market_limit = validate_in_range(market_limit, 1, 100, "MARKET_LIMIT")?;

    let render_fps = args
        .render_fps
        .or_else(|| env::var("RENDER_FPS").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(30);
    let render_fps = validate_in_range(render_fps, 1, 120, "RENDER_FPS")?;

    let theme = match args.theme.or_else(|| env::var("SEADECK_THEME").ok()) {
        Some(name) => Theme::from_str(&name).map_err(|e| anyhow!(e))?,
        None => Theme::default(),
    };

    Ok(Config {
        slug,
        api_key,
        api_url,
        http_timeout_ms,
        market_cache_secs,
        market_limit,
        render_fps,
        theme,
    })
}

impl Config {
    /// Print current configuration (useful for debugging)
    #[allow(dead_code)]
    pub fn print_summary(&self) {
        eprintln!("Seadeck Configuration:");
        eprintln!("  Collection: {}", self.slug);
        eprintln!("  API URL: {}", self.api_url);
        eprintln!(
            "  API Key: {}",
            if self.api_key.is_some() { "configured" } else { "MISSING" }
        );
        eprintln!("  HTTP Timeout: {}ms", self.http_timeout_ms);
        eprintln!("  Market Cache: {}s", self.market_cache_secs);
        eprintln!("  Market Limit: {}", self.market_limit);
        eprintln!("  Render FPS: {}", self.render_fps);
        eprintln!("  Theme: {}", self.theme);
    }
}
