use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::ui::events::{Focus, Prompt};

use super::colors::{ACCENT_ERROR, ACCENT_WARNING, BG_STATUS, TEXT_BRIGHT};

/// Severity of a transient status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Bottom status line: focus, prompt or notice on the left, page state on the right
pub struct StatusBar<'a> {
    route: &'a str,
    focus: Focus,
    prompt: Option<&'a Prompt>,
    notice: Option<&'a Notice>,
    /// Last successful refresh of the current page
    updated_at: Option<DateTime<Utc>>,
    /// Last failed refresh message of the current page
    poll_error: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(route: &'a str, focus: Focus) -> Self {
        Self {
            route,
            focus,
            prompt: None,
            notice: None,
            updated_at: None,
            poll_error: None,
        }
    }

    pub fn prompt(mut self, prompt: Option<&'a Prompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn notice(mut self, notice: Option<&'a Notice>) -> Self {
        self.notice = notice;
        self
    }

    pub fn poll_state(mut self, updated_at: Option<DateTime<Utc>>, error: Option<&'a str>) -> Self {
        self.updated_at = updated_at;
        self.poll_error = error;
        self
    }

    fn focus_label(&self) -> &'static str {
        match self.focus {
            Focus::Sidebar => "EXPLORER",
            Focus::Editor => "EDITOR",
            Focus::Terminal => "TERMINAL",
        }
    }

    fn left_spans(&self) -> Vec<Span<'static>> {
        let bright = Style::default().fg(TEXT_BRIGHT);
        let mut spans = vec![Span::styled(
            format!(" {} ", self.focus_label()),
            bright.add_modifier(Modifier::BOLD),
        )];

        if let Some(prompt) = self.prompt {
            spans.push(Span::styled(
                format!(" {}: {}▏", prompt.kind.label(), prompt.input),
                bright,
            ));
        } else if let Some(notice) = self.notice {
            let style = match notice.level {
                NoticeLevel::Info => bright,
                NoticeLevel::Warning => bright.fg(ACCENT_WARNING),
                NoticeLevel::Error => bright.fg(ACCENT_ERROR),
            };
            spans.push(Span::styled(format!(" {}", notice.text), style));
        }

        spans
    }

    fn right_spans(&self) -> Vec<Span<'static>> {
        let bright = Style::default().fg(TEXT_BRIGHT);
        let mut spans = Vec::new();

        if let Some(error) = self.poll_error {
            spans.push(Span::styled(
                format!("⚠ {}", error),
                bright.fg(ACCENT_WARNING),
            ));
            spans.push(Span::raw("  "));
        } else if let Some(at) = self.updated_at {
            spans.push(Span::styled(
                format!("↻ {}", at.with_timezone(&Local).format("%H:%M:%S")),
                bright,
            ));
            spans.push(Span::raw("  "));
        }

        spans.push(Span::styled(self.route.to_string(), bright));
        spans.push(Span::styled("  UTF-8  ", bright));
        spans
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let left = self.left_spans();
        let right = self.right_spans();
        render_split_line(area, buf, left, right);
    }
}

/// Render a line with left content and right-aligned content (if it fits)
fn render_split_line(
    area: Rect,
    buf: &mut Buffer,
    left_spans: Vec<Span<'static>>,
    right_spans: Vec<Span<'static>>,
) {
    buf.set_style(area, Style::default().bg(BG_STATUS));

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let total_width = area.width as usize;

    let left_line = Line::from(left_spans);
    buf.set_line(area.x, area.y, &left_line, (left_width as u16).min(area.width));

    if !right_spans.is_empty() && left_width + right_width < total_width {
        let right_x = area.x + (total_width - right_width) as u16;
        let right_line = Line::from(right_spans);
        buf.set_line(right_x, area.y, &right_line, right_width as u16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::events::PromptKind;

    fn render(bar: &StatusBar<'_>) -> String {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_shows_focus_and_route() {
        let line = render(&StatusBar::new("/health", Focus::Sidebar));
        assert!(line.starts_with(" EXPLORER "));
        assert!(line.trim_end().ends_with("/health  UTF-8"));
    }

    #[test]
    fn test_prompt_wins_over_notice() {
        let prompt = Prompt::new(PromptKind::AddFile { parent: vec![] }, "notes.md");
        let notice = Notice::error("boom");
        let line = render(
            &StatusBar::new("/", Focus::Sidebar)
                .prompt(Some(&prompt))
                .notice(Some(&notice)),
        );
        assert!(line.contains("New file: notes.md"));
        assert!(!line.contains("boom"));
    }

    #[test]
    fn test_poll_error_is_shown() {
        let line = render(
            &StatusBar::new("/alerts", Focus::Editor).poll_state(None, Some("offline")),
        );
        assert!(line.contains("⚠ offline"));
    }
}
