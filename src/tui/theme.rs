//! Centralized color constants and styles for the TUI

use ratatui::prelude::*;

pub const TITLE_COLOR: Color = Color::Cyan;
pub const MUTED: Color = Color::Gray;
pub const INDEX_COLOR: Color = Color::DarkGray;
pub const ROW_ALT_BG: Color = Color::Indexed(235);

pub const HEADER_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);
pub const ROW_SELECTED: Style = Style::new().add_modifier(Modifier::REVERSED);

pub const STATUS_BAR_BG: Color = Color::Indexed(236);
pub const STATUS_KEY_COLOR: Color = Color::Cyan;
pub const FLASH_SUCCESS: Color = Color::Green;
pub const FLASH_ERROR: Color = Color::Red;

pub const FIELD_FOCUSED: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const FIELD_INVALID: Color = Color::Yellow;
pub const SELECTED_MARK: Color = Color::Green;

// Grant and enrollment scales
pub const BEST_GRANT: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
pub const NO_GRANT: Color = Color::DarkGray;
pub const SCALE_TRACK: Color = Color::Indexed(240);
pub const SCALE_MARKER: Color = Color::Yellow;
pub const SCALE_USER: Color = Color::Cyan;
pub const FOOTNOTE: Color = Color::Yellow;

/// Color for a grant amount: full grants stand out, no grant fades.
pub fn grant_color(amount: u32) -> Color {
    match amount {
        100 => Color::Green,
        70 => Color::LightGreen,
        50 => Color::Yellow,
        _ => NO_GRANT,
    }
}
