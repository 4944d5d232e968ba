//! Theme and styling configuration.

use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

/// Color theme for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Titles and key hints.
    pub accent: Color,
    /// Border of unfocused fields.
    pub border: Color,
    /// Border of the focused field.
    pub border_focused: Color,
    /// Background of the active suggestion.
    pub highlight: Color,
    /// Emphasis of the matched part of a suggestion.
    pub matched: Color,
    /// Background of tags picked from the options.
    pub chip: Color,
    /// Background of free-text tags.
    pub chip_new: Color,
    /// Already-selected suggestions and read-only fields.
    pub dim: Color,
    /// Placeholder text.
    pub placeholder: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            highlight: Color::Blue,
            matched: Color::Yellow,
            chip: Color::Blue,
            chip_new: Color::Magenta,
            dim: Color::DarkGray,
            placeholder: Color::Gray,
        }
    }
}

impl Theme {
    /// Light variant for bright terminals.
    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            accent: Color::Blue,
            border: Color::Gray,
            border_focused: Color::Blue,
            highlight: Color::LightBlue,
            matched: Color::Red,
            chip: Color::LightBlue,
            chip_new: Color::LightMagenta,
            dim: Color::Gray,
            placeholder: Color::DarkGray,
        }
    }

    /// Look up a theme by the name used in the settings file.
    pub fn named(name: &str) -> Self {
        match name {
            "dark" => Self::default(),
            "light" => Self::light(),
            other => {
                warn!(theme = other, "Unknown theme, using dark");
                Self::default()
            }
        }
    }

    /// Style of the matched part of a suggestion.
    pub fn match_style(&self) -> Style {
        Style::default()
            .fg(self.matched)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of the active suggestion row.
    pub fn active_style(&self) -> Style {
        Style::default()
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of a tag chip.
    pub fn chip_style(&self, is_new: bool) -> Style {
        let bg = if is_new { self.chip_new } else { self.chip };
        Style::default().fg(Color::White).bg(bg)
    }
}
