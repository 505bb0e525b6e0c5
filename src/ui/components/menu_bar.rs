//! Title bar with the menu titles and the open dropdown

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::ui::menu::{MenuBarState, MenuId, MENU_DEFS};

use super::colors::{
    fill_bg, BG_MENU, BG_TITLE, BORDER_DEFAULT, SELECTED_BG, TEXT_BRIGHT, TEXT_MUTED, TEXT_PRIMARY,
};

/// Columns before the first title
const LEADING: u16 = 1;
/// Padding on each side of a title
const PAD: u16 = 1;

pub struct MenuBar<'a> {
    state: &'a MenuBarState,
    title: &'a str,
}

impl<'a> MenuBar<'a> {
    pub fn new(state: &'a MenuBarState) -> Self {
        Self { state, title: "" }
    }

    /// Window title centred in the bar
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Column span `(x, width)` of each menu title
    fn title_spans(area: Rect) -> impl Iterator<Item = (MenuId, u16, u16)> {
        let mut x = area.x + LEADING;
        MENU_DEFS.iter().map(move |def| {
            let width = def.label.width() as u16 + PAD * 2;
            let start = x;
            x += width;
            (def.id, start, width)
        })
    }

    /// Menu whose title covers column `x`
    pub fn hit_test(area: Rect, x: u16) -> Option<MenuId> {
        Self::title_spans(area)
            .find(|(_, start, width)| x >= *start && x < start + width)
            .map(|(id, _, _)| id)
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        fill_bg(buf, area, BG_TITLE);

        let mut spans = vec![Span::raw(" ".repeat(LEADING as usize))];
        for def in MENU_DEFS {
            let style = if self.state.open_menu() == Some(def.id) {
                Style::default().bg(BG_MENU).fg(TEXT_BRIGHT)
            } else {
                Style::default().fg(TEXT_PRIMARY)
            };
            spans.push(Span::styled(format!(" {} ", def.label), style));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);

        // Centred when there is room, otherwise pushed right of the menus
        let title_width = self.title.width() as u16;
        if !self.title.is_empty() && title_width + 2 < area.width {
            let menus_end = Self::title_spans(area)
                .last()
                .map(|(_, start, width)| start + width)
                .unwrap_or(area.x);
            let x = (area.x + (area.width - title_width) / 2).max(menus_end + 2);
            if x + title_width <= area.right() {
                buf.set_string(x, area.y, self.title, Style::default().fg(TEXT_MUTED));
            }
        }
    }

    /// Area of the open dropdown below its title, clipped to `bounds`
    pub fn dropdown_area(&self, bar: Rect, bounds: Rect) -> Option<Rect> {
        let open = self.state.open_menu()?;
        let (_, start, _) = Self::title_spans(bar).find(|(id, _, _)| *id == open)?;

        let items = open.def().items;
        let inner_width = items
            .iter()
            .map(|(label, _)| label.width() as u16)
            .max()
            .unwrap_or(0)
            + 4;
        let width = (inner_width + 2).min(bounds.right().saturating_sub(start));
        let height = (items.len() as u16 + 2).min(bounds.bottom().saturating_sub(bar.bottom()));
        if width < 4 || height < 3 {
            return None;
        }
        Some(Rect::new(start, bar.bottom(), width, height))
    }

    /// Dropdown item under a cell
    pub fn item_at(&self, bar: Rect, bounds: Rect, x: u16, y: u16) -> Option<usize> {
        let area = self.dropdown_area(bar, bounds)?;
        let inner = Rect::new(area.x + 1, area.y + 1, area.width - 2, area.height - 2);
        if x < inner.x || x >= inner.right() || y < inner.y || y >= inner.bottom() {
            return None;
        }
        Some((y - inner.y) as usize)
    }

    /// Draw the open dropdown below its title, clipped to `bounds`
    pub fn render_dropdown(&self, bar: Rect, bounds: Rect, buf: &mut Buffer) {
        let (Some(open), Some(area)) = (self.state.open_menu(), self.dropdown_area(bar, bounds))
        else {
            return;
        };
        let items = open.def().items;

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_DEFAULT))
            .style(Style::default().bg(BG_MENU));
        let inner = block.inner(area);
        block.render(area, buf);

        for (i, (label, _)) in items.iter().enumerate().take(inner.height as usize) {
            let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
            let style = if i == self.state.highlighted() {
                Style::default()
                    .bg(SELECTED_BG)
                    .fg(TEXT_BRIGHT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT_PRIMARY)
            };
            buf.set_style(row, style);
            buf.set_stringn(row.x + 1, row.y, label, row.width.saturating_sub(1) as usize, style);
        }
    }
}
