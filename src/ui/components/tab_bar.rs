use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::tab_manager::Tab;

use super::colors::{
    fill_bg, ACCENT_PRIMARY, BG_BASE, BG_TAB_INACTIVE, BG_TITLE, TEXT_BRIGHT, TEXT_MUTED,
};

const CLOSE_GLYPH: &str = "×";

/// Part of the tab bar under a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabBarHitTarget {
    Tab(usize),
    Close(usize),
}

/// Editor tab strip
pub struct TabBar<'a> {
    tabs: &'a [Tab],
    active: Option<usize>,
    focused: bool,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [Tab], active: Option<usize>) -> Self {
        Self {
            tabs,
            active,
            focused: true,
        }
    }

    /// Set whether the editor area has focus
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Rendered width of one tab: " label × " plus a separator column
    fn tab_width(tab: &Tab) -> u16 {
        (tab.label.width() + CLOSE_GLYPH.width() + 4) as u16
    }

    /// Which tab (or close button) sits at column `x`
    pub fn hit_test(&self, area: Rect, x: u16) -> Option<TabBarHitTarget> {
        if x < area.x {
            return None;
        }
        let mut start = area.x;
        for (i, tab) in self.tabs.iter().enumerate() {
            let width = Self::tab_width(tab);
            let end = start.saturating_add(width);
            if x < end {
                // " label " then the glyph, then a space and the separator
                let close_col = end.saturating_sub(3);
                return Some(if x == close_col {
                    TabBarHitTarget::Close(i)
                } else {
                    TabBarHitTarget::Tab(i)
                });
            }
            start = end;
            if start >= area.right() {
                break;
            }
        }
        None
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        fill_bg(buf, area, BG_TITLE);

        let mut spans = Vec::new();
        for (i, tab) in self.tabs.iter().enumerate() {
            let is_active = Some(i) == self.active;
            let (bg, fg) = if is_active {
                (BG_BASE, TEXT_BRIGHT)
            } else {
                (BG_TAB_INACTIVE, TEXT_MUTED)
            };

            let mut label_style = Style::default().bg(bg).fg(fg);
            if is_active && self.focused {
                label_style = label_style.add_modifier(Modifier::BOLD);
            }

            spans.push(Span::styled(format!(" {} ", tab.label), label_style));
            spans.push(Span::styled(
                CLOSE_GLYPH,
                Style::default().bg(bg).fg(if is_active { ACCENT_PRIMARY } else { TEXT_MUTED }),
            ));
            spans.push(Span::styled(" ", Style::default().bg(bg)));
            spans.push(Span::styled("│", Style::default().bg(BG_TITLE).fg(BG_BASE)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
