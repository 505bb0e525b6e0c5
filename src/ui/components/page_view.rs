//! Editor area body for the displayed route

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::ui::api_client::ApiClientPage;
use crate::ui::pages::PageSpec;
use crate::ui::poller::SnapshotSlot;

use super::colors::{
    fill_bg, ACCENT_ERROR, ACCENT_PRIMARY, ACCENT_SUCCESS, ACCENT_WARNING, BG_BASE, SELECTED_BG,
    TEXT_BRIGHT, TEXT_FAINT, TEXT_MUTED, TEXT_PRIMARY,
};

/// Most lines of a snapshot rendered as JSON
const MAX_JSON_LINES: usize = 200;

/// Renders the page registered for a route, or a placeholder
pub struct PageView<'a> {
    route: &'a str,
    page: Option<&'a PageSpec>,
    snapshot: Option<&'a SnapshotSlot>,
    api_client: Option<&'a ApiClientPage>,
    scroll: u16,
}

impl<'a> PageView<'a> {
    pub fn new(route: &'a str, page: Option<&'a PageSpec>) -> Self {
        Self {
            route,
            page,
            snapshot: None,
            api_client: None,
            scroll: 0,
        }
    }

    pub fn snapshot(mut self, snapshot: Option<&'a SnapshotSlot>) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Render the API client form instead of raw snapshot data
    pub fn api_client(mut self, page: &'a ApiClientPage) -> Self {
        self.api_client = Some(page);
        self
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    fn header(&self) -> Vec<Line<'static>> {
        let title_style = Style::default().fg(TEXT_BRIGHT).add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(TEXT_MUTED);
        match self.page {
            Some(page) => vec![
                Line::styled(page.title, title_style),
                Line::styled(page.summary, muted),
                Line::raw(""),
            ],
            None if self.route.starts_with("/untitled-") => vec![
                Line::styled("Untitled", title_style),
                Line::styled("Empty editor.", muted),
                Line::raw(""),
            ],
            None => vec![
                Line::styled("Not Found", title_style),
                Line::styled(format!("No page is registered for {}", self.route), muted),
                Line::raw(""),
            ],
        }
    }

    fn snapshot_lines(&self) -> Vec<Line<'static>> {
        let muted = Style::default().fg(TEXT_MUTED);
        let mut lines = Vec::new();

        let Some(slot) = self.snapshot else {
            lines.push(Line::styled("Loading...", muted));
            return lines;
        };

        if let Some(error) = slot.last_error() {
            lines.push(Line::styled(
                format!("⚠ {}", error),
                Style::default().fg(ACCENT_WARNING),
            ));
        }

        let Some(data) = slot.data() else {
            if slot.last_error().is_none() {
                lines.push(Line::styled("No data.", muted));
            }
            return lines;
        };

        if let Some(count) = slot.count() {
            lines.push(Line::styled(format!("{} items", count), muted));
        }

        let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        let json_style = Style::default().fg(TEXT_PRIMARY);
        let mut json_lines = pretty.lines();
        lines.extend(
            json_lines
                .by_ref()
                .take(MAX_JSON_LINES)
                .map(|line| Line::styled(line.to_string(), json_style)),
        );
        if json_lines.next().is_some() {
            lines.push(Line::styled("…", Style::default().fg(TEXT_FAINT)));
        }
        lines
    }

    fn api_client_lines(page: &ApiClientPage) -> Vec<Line<'static>> {
        let muted = Style::default().fg(TEXT_MUTED);
        let text = Style::default().fg(TEXT_PRIMARY);
        let heading = muted.add_modifier(Modifier::BOLD);
        let mut lines = vec![Line::styled("SAVED REQUESTS", heading)];

        if page.requests().is_empty() {
            lines.push(Line::styled("  (none)", muted));
        }
        for request in page.requests() {
            let selected = page.selected_id() == Some(request.id);
            let style = if selected {
                Style::default().bg(SELECTED_BG).fg(TEXT_BRIGHT)
            } else {
                text
            };
            lines.push(Line::from(vec![
                Span::styled(if selected { "▸ " } else { "  " }, style),
                Span::styled(format!("{:<6} ", request.method.as_str()), style.fg(ACCENT_SUCCESS)),
                Span::styled(request.name.clone(), style),
                Span::styled(format!("  {}", request.url), muted),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::styled("REQUEST", heading));
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", page.draft.method),
                Style::default().fg(ACCENT_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled(page.draft.url.clone(), text),
        ]));
        lines.extend(
            page.draft
                .body
                .lines()
                .map(|line| Line::styled(format!("  {}", line), muted)),
        );

        lines.push(Line::raw(""));
        lines.push(Line::styled("RESPONSE", heading));
        if page.is_sending() {
            lines.push(Line::styled("Sending...", Style::default().fg(ACCENT_WARNING)));
        }
        if let Some(error) = page.error() {
            lines.push(Line::styled(
                format!("✗ {}", error),
                Style::default().fg(ACCENT_ERROR),
            ));
        }
        if let Some(response) = page.response() {
            let status_color = if response.success && response.status < 400 {
                ACCENT_SUCCESS
            } else {
                ACCENT_ERROR
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} {}", response.status, response.status_text),
                    Style::default().fg(status_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {} ms", response.elapsed_ms), muted),
            ]));
            if let Some(body) = &response.body {
                let pretty = if response.is_json == Some(true) {
                    serde_json::from_str::<serde_json::Value>(body)
                        .ok()
                        .and_then(|value| serde_json::to_string_pretty(&value).ok())
                        .unwrap_or_else(|| body.clone())
                } else {
                    body.clone()
                };
                lines.extend(
                    pretty
                        .lines()
                        .take(MAX_JSON_LINES)
                        .map(|line| Line::styled(line.to_string(), text)),
                );
            }
        } else if !page.is_sending() && page.error().is_none() {
            lines.push(Line::styled("Send a request to see the response.", muted));
        }

        lines
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        fill_bg(buf, area, BG_BASE);
        if area.width < 4 || area.height == 0 {
            return;
        }

        let mut lines = self.header();
        if let Some(page) = self.api_client {
            lines.extend(Self::api_client_lines(page));
        } else if self.page.is_some_and(|page| page.endpoint.is_some()) {
            lines.extend(self.snapshot_lines());
        }

        let inner = Rect::new(area.x + 2, area.y + 1, area.width - 2, area.height.saturating_sub(1));
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}
