//! Typed theme tokens with dark and light palettes.
//!
//! Screens never name a raw color. They ask the active [`Theme`] for a
//! [`ThemeToken`] or one of the semantic styles built on top of it.

use clap::ValueEnum;
use ratatui::style::{Color, Modifier, Style};

/// Which palette is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// Parse a config value (`dark` / `light`, any case).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// A semantic color slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeToken {
    /// Table and overlay background.
    Background,
    /// Selected row and sorted column tint.
    Highlight,
    Text,
    TextDim,
    Accent,
    AccentAlt,
    Border,
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    background: Color,
    highlight: Color,
    text: Color,
    text_dim: Color,
    accent: Color,
    accent_alt: Color,
    border: Color,
    success: Color,
    error: Color,
    warning: Color,
    info: Color,
}

// ── Palettes ──────────────────────────────────────────────────────────

const DARK: Palette = Palette {
    background: Color::Rgb(30, 31, 41),  // #1e1f29
    highlight: Color::Rgb(50, 52, 68),   // #323444
    text: Color::Rgb(189, 193, 207),     // #bdc1cf
    text_dim: Color::Rgb(98, 114, 164),  // #6272a4
    accent: Color::Rgb(128, 255, 234),   // #80ffea
    accent_alt: Color::Rgb(225, 53, 255), // #e135ff
    border: Color::Rgb(98, 114, 164),    // #6272a4
    success: Color::Rgb(80, 250, 123),   // #50fa7b
    error: Color::Rgb(255, 99, 99),      // #ff6363
    warning: Color::Rgb(241, 250, 140),  // #f1fa8c
    info: Color::Rgb(139, 233, 253),     // #8be9fd
};

const LIGHT: Palette = Palette {
    background: Color::Rgb(250, 250, 252), // #fafafc
    highlight: Color::Rgb(226, 232, 240),  // #e2e8f0
    text: Color::Rgb(33, 37, 41),          // #212529
    text_dim: Color::Rgb(108, 117, 125),   // #6c757d
    accent: Color::Rgb(13, 110, 253),      // #0d6efd
    accent_alt: Color::Rgb(111, 66, 193),  // #6f42c1
    border: Color::Rgb(173, 181, 189),     // #adb5bd
    success: Color::Rgb(25, 135, 84),      // #198754
    error: Color::Rgb(220, 53, 69),        // #dc3545
    warning: Color::Rgb(176, 110, 0),      // #b06e00
    info: Color::Rgb(13, 202, 240),        // #0dcaf0
};

/// The active palette plus semantic styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    mode: ThemeMode,
    palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        let palette = match mode {
            ThemeMode::Dark => DARK,
            ThemeMode::Light => LIGHT,
        };
        Self { mode, palette }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn color(&self, token: ThemeToken) -> Color {
        let p = &self.palette;
        match token {
            ThemeToken::Background => p.background,
            ThemeToken::Highlight => p.highlight,
            ThemeToken::Text => p.text,
            ThemeToken::TextDim => p.text_dim,
            ThemeToken::Accent => p.accent,
            ThemeToken::AccentAlt => p.accent_alt,
            ThemeToken::Border => p.border,
            ThemeToken::Success => p.success,
            ThemeToken::Error => p.error,
            ThemeToken::Warning => p.warning,
            ThemeToken::Info => p.info,
        }
    }

    pub fn fg(&self, token: ThemeToken) -> Style {
        Style::default().fg(self.color(token))
    }

    // ── Semantic Styles ───────────────────────────────────────────────

    /// Title text for blocks/panels.
    pub fn title(&self) -> Style {
        self.fg(ThemeToken::Accent).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.fg(ThemeToken::AccentAlt)
        } else {
            self.fg(ThemeToken::Border)
        }
    }

    /// Fill for tables and overlays.
    pub fn surface(&self) -> Style {
        Style::default()
            .bg(self.color(ThemeToken::Background))
            .fg(self.color(ThemeToken::Text))
    }

    pub fn table_header(&self) -> Style {
        self.fg(ThemeToken::Accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn table_selected(&self) -> Style {
        self.fg(ThemeToken::AccentAlt)
            .bg(self.color(ThemeToken::Highlight))
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_active(&self) -> Style {
        self.fg(ThemeToken::AccentAlt).add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive(&self) -> Style {
        self.fg(ThemeToken::Text)
    }

    /// Key hint text (e.g., "q quit  ? help").
    pub fn key_hint(&self) -> Style {
        self.fg(ThemeToken::TextDim)
    }

    /// Key hint key character.
    pub fn key_hint_key(&self) -> Style {
        self.fg(ThemeToken::Accent).add_modifier(Modifier::BOLD)
    }

    /// Inline error banner.
    pub fn banner_error(&self) -> Style {
        self.fg(ThemeToken::Error).add_modifier(Modifier::BOLD)
    }
}
