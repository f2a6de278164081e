// Centralized theme system for consistent UI styling
// All colors and styles are defined here - edit this file to change the look

use parrot_core::models::NoteColor;
use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// App background - pure black for contrast
pub const BG_APP: Color = Color::Rgb(0, 0, 0);

/// Card/message background - very subtle lift from black
pub const BG_CARD: Color = Color::Rgb(18, 18, 18);

/// Selected item background
pub const BG_SELECTED: Color = Color::Rgb(32, 32, 32);

/// Sidebar background - very dark, almost black
pub const BG_SIDEBAR: Color = Color::Rgb(12, 12, 12);

/// Input field background
pub const BG_INPUT: Color = Color::Rgb(18, 18, 18);

/// Floating overlay background - elevated from the view beneath
pub const BG_OVERLAY: Color = Color::Rgb(24, 24, 24);

/// Primary text - off-white for readability
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);

/// Secondary/muted text
pub const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);

/// Dimmed text for hints, placeholders
pub const TEXT_DIM: Color = Color::Rgb(90, 90, 90);

/// Primary accent - muted blue (for interactive elements, focus)
pub const ACCENT_PRIMARY: Color = Color::Rgb(86, 156, 214);

/// Success/positive - muted green
pub const ACCENT_SUCCESS: Color = Color::Rgb(106, 153, 85);

/// Warning - muted amber/orange
pub const ACCENT_WARNING: Color = Color::Rgb(206, 145, 120);

/// Error - muted red
pub const ACCENT_ERROR: Color = Color::Rgb(244, 112, 112);

/// Special - muted purple (agent responses, overlays)
pub const ACCENT_SPECIAL: Color = Color::Rgb(169, 154, 203);

/// Active/focused border
pub const BORDER_ACTIVE: Color = Color::Rgb(100, 100, 100);

/// Inactive border
pub const BORDER_INACTIVE: Color = Color::Rgb(60, 60, 60);

// =============================================================================
// STYLE FUNCTIONS
// =============================================================================

pub fn text_primary() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn text_dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn text_bold() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn border_active() -> Style {
    Style::default().fg(BORDER_ACTIVE)
}

pub fn border_inactive() -> Style {
    Style::default().fg(BORDER_INACTIVE)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT_PRIMARY)
}

pub fn interactive_selected() -> Style {
    Style::default()
        .fg(ACCENT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn status_success() -> Style {
    Style::default().fg(ACCENT_SUCCESS)
}

pub fn status_warning() -> Style {
    Style::default().fg(ACCENT_WARNING)
}

pub fn status_error() -> Style {
    Style::default().fg(ACCENT_ERROR)
}

pub fn status_info() -> Style {
    Style::default().fg(ACCENT_PRIMARY)
}

pub fn input_active() -> Style {
    Style::default().fg(TEXT_PRIMARY).bg(BG_INPUT)
}

pub fn input_placeholder() -> Style {
    Style::default().fg(TEXT_DIM).bg(BG_INPUT)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn agent_response() -> Style {
    Style::default()
        .fg(ACCENT_SPECIAL)
        .add_modifier(Modifier::ITALIC)
}

pub fn pending_indicator() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC)
}

/// Map a note's palette color to a terminal color
pub fn note_color(color: NoteColor) -> Color {
    match color {
        NoteColor::Slate => Color::Rgb(110, 120, 135),
        NoteColor::Amber => Color::Rgb(206, 160, 90),
        NoteColor::Sage => Color::Rgb(106, 153, 85),
        NoteColor::Sky => Color::Rgb(86, 156, 214),
        NoteColor::Rose => Color::Rgb(200, 110, 130),
        NoteColor::Lavender => Color::Rgb(169, 154, 203),
    }
}
