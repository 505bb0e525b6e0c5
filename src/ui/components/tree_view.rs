//! Explorer tree widget rendering the visible rows of a [`FileTree`](crate::ui::file_tree::FileTree)

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::ui::file_tree::TreeRow;

use super::colors::{ACCENT_PRIMARY, SELECTED_BG, TEXT_MUTED, TEXT_PRIMARY};

/// Selection and scroll position within the explorer
#[derive(Debug, Default, Clone)]
pub struct TreeViewState {
    /// Currently selected index in the visible rows
    pub selected: usize,
    /// Scroll offset
    pub offset: usize,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_previous(&mut self, visible_count: usize) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = visible_count.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self, visible_count: usize) {
        if visible_count > 0 {
            self.selected = (self.selected + 1) % visible_count;
        }
    }

    /// Map a row inside the widget area to a visible row index
    pub fn index_at(&self, row: u16, visible_count: usize) -> Option<usize> {
        let index = self.offset + row as usize;
        (index < visible_count).then_some(index)
    }

    /// Keep the selection inside the list and inside the viewport
    fn clamp(&mut self, visible_count: usize, viewport_height: usize) {
        if self.selected >= visible_count {
            self.selected = visible_count.saturating_sub(1);
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if viewport_height > 0 && self.selected >= self.offset + viewport_height {
            self.offset = self.selected + 1 - viewport_height;
        }
    }
}

/// Tree view widget
pub struct TreeView<'a> {
    rows: &'a [TreeRow],
    block: Option<Block<'a>>,
    style: Style,
    selected_style: Style,
    /// Route of the active tab, highlighted when a file points at it
    active_route: Option<&'a str>,
}

impl<'a> TreeView<'a> {
    pub fn new(rows: &'a [TreeRow]) -> Self {
        Self {
            rows,
            block: None,
            style: Style::default().fg(TEXT_PRIMARY),
            selected_style: Style::default().bg(SELECTED_BG),
            active_route: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn selected_style(mut self, style: Style) -> Self {
        self.selected_style = style;
        self
    }

    pub fn active_route(mut self, route: Option<&'a str>) -> Self {
        self.active_route = route;
        self
    }
}

impl StatefulWidget for TreeView<'_> {
    type State = TreeViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        if inner.width < 3 || inner.height < 1 || self.rows.is_empty() {
            return;
        }

        state.clamp(self.rows.len(), inner.height as usize);

        for (i, row) in self
            .rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize)
        {
            let y = inner.y + (i - state.offset) as u16;

            let marker = if !row.is_folder {
                "  "
            } else if row.expanded {
                "▼ "
            } else {
                "▶ "
            };

            let is_active = row.route.is_some() && row.route.as_deref() == self.active_route;
            let label_style = if is_active {
                self.style.fg(ACCENT_PRIMARY).add_modifier(Modifier::BOLD)
            } else if row.is_folder {
                self.style.add_modifier(Modifier::BOLD)
            } else {
                self.style
            };

            let line = Line::from(vec![
                Span::raw("  ".repeat(row.depth)),
                Span::styled(marker, Style::default().fg(TEXT_MUTED)),
                Span::styled(row.name.as_str(), label_style),
            ]);

            let line_area = Rect::new(inner.x, y, inner.width, 1);
            if i == state.selected {
                buf.set_style(line_area, self.selected_style);
            }
            line.render(line_area, buf);
        }
    }
}
