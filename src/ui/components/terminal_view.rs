use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::terminal_pane::{TerminalPane, PROMPT};

use super::colors::{
    fill_bg, ACCENT_SUCCESS, BG_TERMINAL, BORDER_DEFAULT, BORDER_FOCUSED, TEXT_BRIGHT, TEXT_MUTED,
    TEXT_PRIMARY,
};

/// Bottom terminal panel; shows the newest lines that fit above the input row
pub struct TerminalView<'a> {
    pane: &'a TerminalPane,
    focused: bool,
}

impl<'a> TerminalView<'a> {
    pub fn new(pane: &'a TerminalPane) -> Self {
        Self {
            pane,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for TerminalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        fill_bg(buf, area, BG_TERMINAL);

        let border = if self.focused {
            BORDER_FOCUSED
        } else {
            BORDER_DEFAULT
        };
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                " TERMINAL ",
                Style::default().fg(TEXT_BRIGHT).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let output_rows = inner.height.saturating_sub(1) as usize;
        let lines = self.pane.lines();
        let skip = lines.len().saturating_sub(output_rows);

        let mut rendered: Vec<Line> = lines[skip..]
            .iter()
            .map(|line| {
                if line.starts_with(PROMPT) {
                    Line::styled(line.as_str(), Style::default().fg(TEXT_PRIMARY))
                } else {
                    Line::styled(line.as_str(), Style::default().fg(TEXT_MUTED))
                }
            })
            .collect();

        let cursor = if self.focused { "▏" } else { "" };
        rendered.push(Line::from(vec![
            Span::styled(format!("{} ", PROMPT), Style::default().fg(ACCENT_SUCCESS)),
            Span::styled(self.pane.input(), Style::default().fg(TEXT_BRIGHT)),
            Span::styled(cursor, Style::default().fg(TEXT_BRIGHT)),
        ]));

        Paragraph::new(rendered).render(inner, buf);
    }
}
