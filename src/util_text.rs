/// Scale an integer token amount into a decimal price.
/// OpenSea returns prices as `{value: "1500000000000000000", decimals: 18}`;
/// this computes `value / 10^decimals`. Unparseable input yields 0.0.
pub fn scaled_price(value: &str, decimals: u32) -> f64 {
    let raw: f64 = value.trim().parse().unwrap_or(0.0);
    raw / 10f64.powi(decimals as i32)
}

/// Format a price the way the grid shows it, e.g. "1.5000 ETH".
pub fn format_price(amount: f64, symbol: &str) -> String {
    format!("{amount:.4} {symbol}")
}

/// Shorten a 0x address for display: "0x9e1d…f923".
pub fn short_addr(addr: &str) -> String {
    if addr.len() > 12 {
        format!("{}…{}", &addr[..6], &addr[addr.len() - 4..])
    } else {
        addr.to_string()
    }
}

/// Humanize an ISO-8601 or unix-seconds event timestamp into a relative
/// "when" string. Falls back to the raw input when it cannot be parsed.
pub fn humanize_when(raw: &str) -> String {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .ok()
        .or_else(|| {
            raw.parse::<i64>()
                .ok()
                .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        });

    let Some(ts) = parsed else {
        return raw.to_string();
    };

    let delta = chrono::Utc::now().signed_duration_since(ts);
    let mins = delta.num_minutes();
    if mins < 1 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{mins}m ago")
    } else if mins < 60 * 24 {
        format!("{}h ago", mins / 60)
    } else {
        format!("{}d ago", mins / (60 * 24))
    }
}

/// Truncate a string to `max` chars with a trailing ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_price_eth_decimals() {
        let p = scaled_price("1500000000000000000", 18);
        assert!((p - 1.5).abs() < 1e-9);
    }

    #[test]
    fn scaled_price_stablecoin_decimals() {
        let p = scaled_price("2500000", 6);
        assert!((p - 2.5).abs() < 1e-9);
    }

    #[test]
    fn scaled_price_garbage_is_zero() {
        assert_eq!(scaled_price("not-a-number", 18), 0.0);
        assert_eq!(scaled_price("", 6), 0.0);
    }

    #[test]
    fn format_price_four_decimals() {
        assert_eq!(format_price(1.5, "ETH"), "1.5000 ETH");
        assert_eq!(format_price(0.0, "WETH"), "0.0000 WETH");
    }

    #[test]
    fn short_addr_middle_ellipsis() {
        let s = short_addr("0x9e1dadf6eb875cf927c85a430887f2945039f923");
        assert_eq!(s, "0x9e1d…f923");
        assert_eq!(short_addr("0xabc"), "0xabc");
    }

    #[test]
    fn truncate_respects_short_input() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
