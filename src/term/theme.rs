//! Colour palette and text styles used across the terminal backend.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn frame_label_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn menu_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    // ── widgets ────────────────────────────────────────────────
    pub fn text_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn field_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Gray)
    }

    pub fn button_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_tab_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    /// Applied on top of a widget's own style when it holds focus.
    pub fn focus_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── menu popup ─────────────────────────────────────────────
    pub fn popup_selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_item_style() -> Style {
        Style::default().fg(Color::White)
    }
}
