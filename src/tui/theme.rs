//! Dashboard color themes

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Ember, // warm orange
    Neon,  // magenta / green
    Ice,   // cold blue
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Theme::Ember, Theme::Neon, Theme::Ice]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Ember => "ember",
            Theme::Neon => "neon",
            Theme::Ice => "ice",
        }
    }

    pub fn next(&self) -> Theme {
        let all = Self::all();
        let idx = all.iter().position(|t| t == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    /// Borders, titles and the clock
    pub fn accent(&self) -> Color {
        match self {
            Theme::Ember => Color::Rgb(255, 122, 24),
            Theme::Neon => Color::Rgb(255, 0, 170),
            Theme::Ice => Color::Rgb(90, 200, 250),
        }
    }

    /// Phase label and the active tab
    pub fn highlight(&self) -> Color {
        match self {
            Theme::Ember => Color::Rgb(255, 214, 10),
            Theme::Neon => Color::Rgb(57, 255, 20),
            Theme::Ice => Color::Rgb(200, 240, 255),
        }
    }

    pub fn muted(&self) -> Color {
        Color::DarkGray
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme '{0}' (ember, neon, ice)")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::all()
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseThemeError(s.trim().to_string()))
    }
}
