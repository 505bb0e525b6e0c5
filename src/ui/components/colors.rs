//! Dark+ palette shared by the shell widgets

use ratatui::style::Color;

pub const BG_BASE: Color = Color::Rgb(30, 30, 30);
pub const BG_SIDEBAR: Color = Color::Rgb(37, 37, 38);
pub const BG_ACTIVITY: Color = Color::Rgb(51, 51, 51);
pub const BG_TITLE: Color = Color::Rgb(50, 50, 51);
pub const BG_MENU: Color = Color::Rgb(60, 60, 60);
pub const BG_TAB_INACTIVE: Color = Color::Rgb(45, 45, 45);
pub const BG_TERMINAL: Color = Color::Rgb(24, 24, 24);
pub const BG_STATUS: Color = Color::Rgb(0, 122, 204);

pub const SELECTED_BG: Color = Color::Rgb(9, 71, 113);
pub const SELECTED_BG_DIM: Color = Color::Rgb(55, 55, 61);

pub const BORDER_DEFAULT: Color = Color::Rgb(60, 60, 60);
pub const BORDER_FOCUSED: Color = Color::Rgb(0, 120, 212);

pub const TEXT_PRIMARY: Color = Color::Rgb(204, 204, 204);
pub const TEXT_BRIGHT: Color = Color::Rgb(255, 255, 255);
pub const TEXT_MUTED: Color = Color::Rgb(133, 133, 133);
pub const TEXT_FAINT: Color = Color::Rgb(90, 90, 90);

pub const ACCENT_PRIMARY: Color = Color::Rgb(0, 122, 204);
pub const ACCENT_SUCCESS: Color = Color::Rgb(137, 209, 133);
pub const ACCENT_WARNING: Color = Color::Rgb(204, 167, 0);
pub const ACCENT_ERROR: Color = Color::Rgb(241, 76, 76);

/// Fill every cell of `area` with a background color
pub fn fill_bg(buf: &mut ratatui::buffer::Buffer, area: ratatui::layout::Rect, bg: Color) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            buf[(x, y)].set_bg(bg);
        }
    }
}
