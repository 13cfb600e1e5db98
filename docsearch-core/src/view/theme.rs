//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Mocha Theme Color Palette
//!
//! Color constants and the handful of styles the search views share.
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, instrument};

#[instrument(level = "debug")]
pub fn init_theme() {
    debug!("Initializing Catppuccin Mocha theme");
    debug!("Background: {:?}", BACKGROUND);
    debug!("Foreground: {:?}", FOREGROUND);
}

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

pub fn panel_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

pub fn input_border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(CYAN)
    } else {
        Style::default().fg(COMMENT)
    }
}

pub fn results_border_style() -> Style {
    Style::default().fg(PURPLE)
}

pub fn active_row_style() -> Style {
    Style::default().bg(CURRENT_LINE).fg(FOREGROUND)
}

pub fn breadcrumb_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn title_style() -> Style {
    Style::default().fg(FOREGROUND).add_modifier(Modifier::BOLD)
}

/// `<mark>` segments.
pub fn highlight_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn hint_style() -> Style {
    Style::default().fg(COMMENT)
}
