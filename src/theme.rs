//! Color themes for the storefront UI, selectable via CLI flag.

use ratatui::style::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Nord-inspired (default) - modern muted colors
    Nord,
    /// Classic DOS Blue - white on blue
    DosBlue,
    /// Amber CRT - retro terminal orange
    AmberCrt,
}

impl Theme {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "nord" => Ok(Theme::Nord),
            "dos" | "dosblue" | "dos-blue" => Ok(Theme::DosBlue),
            "amber" | "ambercrt" | "amber-crt" => Ok(Theme::AmberCrt),
            _ => Err(format!(
                "Unknown theme '{s}'. Available: nord, dos-blue, amber-crt"
            )),
        }
    }

    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Nord => ColorScheme::nord(),
            Theme::DosBlue => ColorScheme::dos_blue(),
            Theme::AmberCrt => ColorScheme::amber_crt(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Nord
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Nord => write!(f, "nord"),
            Theme::DosBlue => write!(f, "dos-blue"),
            Theme::AmberCrt => write!(f, "amber-crt"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub background: Color,
    pub text: Color,
    pub text_dim: Color,
    pub focus_border: Color,
    pub unfocused_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Price column / market badges
    pub price: Color,
    pub toast_success: Color,
    pub toast_error: Color,
}

impl ColorScheme {
    pub fn nord() -> Self {
        Self {
            background: Color::Black,
            text: Color::White,
            text_dim: Color::Gray,
            focus_border: Color::Yellow,
            unfocused_border: Color::Gray,
            selection_bg: Color::Yellow,
            selection_fg: Color::Black,
            price: Color::Cyan,
            toast_success: Color::Green,
            toast_error: Color::Red,
        }
    }

    pub fn dos_blue() -> Self {
        Self {
            background: Color::Blue,
            text: Color::White,
            text_dim: Color::LightBlue,
            focus_border: Color::Yellow,
            unfocused_border: Color::Cyan,
            selection_bg: Color::Cyan,
            selection_fg: Color::Black,
            price: Color::LightCyan,
            toast_success: Color::LightGreen,
            toast_error: Color::LightRed,
        }
    }

    pub fn amber_crt() -> Self {
        let amber = Color::Rgb(255, 176, 0);
        let amber_bright = Color::Rgb(255, 200, 100);
        let amber_dim = Color::Rgb(180, 120, 0);
        Self {
            background: Color::Black,
            text: amber,
            text_dim: amber_dim,
            focus_border: amber_bright,
            unfocused_border: amber_dim,
            selection_bg: amber,
            selection_fg: Color::Black,
            price: amber_bright,
            toast_success: Color::Rgb(100, 255, 100),
            toast_error: Color::Red,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::nord()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parsing() {
        assert_eq!(Theme::from_str("nord").unwrap(), Theme::Nord);
        assert_eq!(Theme::from_str("NORD").unwrap(), Theme::Nord);
        assert_eq!(Theme::from_str("dos-blue").unwrap(), Theme::DosBlue);
        assert_eq!(Theme::from_str("amber").unwrap(), Theme::AmberCrt);
        assert!(Theme::from_str("invalid").is_err());
    }
}
