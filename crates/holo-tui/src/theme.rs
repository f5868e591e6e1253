//! Color theme support

use ratatui::style::{Color, Modifier, Style};

/// Palette for the chat screen, chosen with `--theme` or `theme = ...`
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    /// Question text and plain answer text
    pub fg: Color,
    /// List markers, hints, link targets, the thinking row
    pub dim: Color,
    /// Spinner, headings in answers, focused input border, welcome line
    pub accent: Color,
    /// "You" header
    pub user: Color,
    /// "Holo" header
    pub assistant: Color,
    /// Error banner
    pub error: Color,
    pub border: Color,
    /// Inline code and code blocks in answers
    pub code: Color,
    pub link: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Default; keeps the terminal's own background
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            user: Color::Rgb(168, 85, 247),
            assistant: Color::Cyan,
            error: Color::Red,
            border: Color::DarkGray,
            code: Color::Magenta,
            link: Color::Blue,
        }
    }

    /// For light terminals; headers use darker shades of the same hues
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            user: Color::Rgb(126, 34, 206),
            assistant: Color::Rgb(14, 116, 144),
            error: Color::Red,
            border: Color::Gray,
            code: Color::Magenta,
            link: Color::Blue,
        }
    }

    /// Resolve a configured name, case-insensitive
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Header style for user turns
    pub fn user_style(&self) -> Style {
        Style::default().fg(self.user).add_modifier(Modifier::BOLD)
    }

    /// Header style for assistant turns
    pub fn assistant_style(&self) -> Style {
        Style::default()
            .fg(self.assistant)
            .add_modifier(Modifier::BOLD)
    }

    /// Error banner text
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn code_style(&self) -> Style {
        Style::default().fg(self.code)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }
}
