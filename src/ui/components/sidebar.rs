//! Activity bar and sidebar panels

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use crate::ui::file_tree::TreeRow;

use super::colors::{
    fill_bg, ACCENT_PRIMARY, ACCENT_SUCCESS, ACCENT_WARNING, BG_ACTIVITY, BG_SIDEBAR,
    BORDER_DEFAULT, SELECTED_BG, SELECTED_BG_DIM, TEXT_BRIGHT, TEXT_MUTED, TEXT_PRIMARY,
};
use super::tree_view::{TreeView, TreeViewState};

/// Width of the activity (icon) bar
pub const ACTIVITY_BAR_WIDTH: u16 = 3;

/// Rows above the panel body (title + separator)
pub const SIDEBAR_HEADER_ROWS: u16 = 2;

/// The fixed set of sidebar panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Explorer,
    Search,
    SourceControl,
    Debug,
    Extensions,
}

impl PanelId {
    pub const ALL: [PanelId; 5] = [
        PanelId::Explorer,
        PanelId::Search,
        PanelId::SourceControl,
        PanelId::Debug,
        PanelId::Extensions,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PanelId::Explorer => "explorer",
            PanelId::Search => "search",
            PanelId::SourceControl => "git",
            PanelId::Debug => "debug",
            PanelId::Extensions => "extensions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PanelId::Explorer => "Explorer",
            PanelId::Search => "Search",
            PanelId::SourceControl => "Source Control",
            PanelId::Debug => "Run and Debug",
            PanelId::Extensions => "Extensions",
        }
    }

    fn icon(self) -> char {
        match self {
            PanelId::Explorer => '⎘',
            PanelId::Search => '⌕',
            PanelId::SourceControl => '⑂',
            PanelId::Debug => '▷',
            PanelId::Extensions => '▦',
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|panel| panel.id() == id)
    }
}

/// Sidebar selection state
#[derive(Debug, Clone)]
pub struct SidebarState {
    active: PanelId,
    collapsed: bool,
    /// Whether keyboard focus is in the sidebar
    pub focused: bool,
    /// Explorer selection
    pub tree_state: TreeViewState,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            active: PanelId::Explorer,
            collapsed: false,
            focused: false,
            tree_state: TreeViewState::new(),
        }
    }
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on an activity icon.
    ///
    /// Reselecting the active panel toggles the collapsed flag; any other
    /// panel becomes active and expanded.
    pub fn select_icon(&mut self, panel: PanelId) {
        if panel == self.active {
            self.collapsed = !self.collapsed;
        } else {
            self.active = panel;
            self.collapsed = false;
        }
        tracing::debug!(panel = panel.id(), collapsed = self.collapsed, "Sidebar icon selected");
    }

    /// Activate and expand a panel unconditionally
    pub fn show(&mut self, panel: PanelId) {
        self.active = panel;
        self.collapsed = false;
    }

    pub fn active(&self) -> PanelId {
        self.active
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Whether the explorer tree is on screen
    pub fn explorer_visible(&self) -> bool {
        !self.collapsed && self.active == PanelId::Explorer
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

struct GitChange {
    file: &'static str,
    path: &'static str,
    status: char,
}

const GIT_CHANGES: &[GitChange] = &[
    GitChange {
        file: "header.tsx",
        path: "apps/web/app/components/header.tsx",
        status: 'M',
    },
    GitChange {
        file: "leftMenu.tsx",
        path: "apps/web/app/components/leftMenu.tsx",
        status: 'M',
    },
];

const GIT_HISTORY: &[(&str, &str, &str)] = &[
    ("fix: Rename header component", "yeonii20", "2 hours ago"),
    ("feat: Apply terminal component", "yeonii20", "5 hours ago"),
    ("style: tailwind css lint", "Suyoooi", "1 day ago"),
    ("Merge pull request #23 from origin/main", "CI", "2 days ago"),
];

const DEBUG_CONFIGS: &[(&str, &str)] = &[
    ("Launch Web (Next.js)", "launch"),
    ("Attach to Node.js server", "attach"),
];

const DEBUG_BREAKPOINTS: &[(&str, u32, bool)] = &[
    ("apps/web/app/pages/api-client.tsx", 42, true),
    ("apps/web/app/pages/terminal.tsx", 88, false),
];

struct Extension {
    name: &'static str,
    author: &'static str,
    description: &'static str,
    rating: f32,
    downloads: &'static str,
    installed: bool,
}

const EXTENSIONS: &[Extension] = &[
    Extension {
        name: "VS Theme Pack",
        author: "Team VS",
        description: "A collection of popular dark and light themes.",
        rating: 4.8,
        downloads: "120k",
        installed: true,
    },
    Extension {
        name: "ESLint",
        author: "Dirk B.",
        description: "Integrates ESLint JavaScript into your editor.",
        rating: 4.6,
        downloads: "3.5M",
        installed: true,
    },
    Extension {
        name: "Prettier",
        author: "Prettier",
        description: "An opinionated code formatter for multiple languages.",
        rating: 4.7,
        downloads: "6.1M",
        installed: true,
    },
    Extension {
        name: "GitLens",
        author: "GitKraken",
        description: "Supercharge the Git capabilities built into your editor.",
        rating: 4.9,
        downloads: "15M",
        installed: false,
    },
];

/// Sidebar widget: activity bar plus the active panel
pub struct Sidebar<'a> {
    rows: &'a [TreeRow],
    active_route: Option<&'a str>,
}

impl<'a> Sidebar<'a> {
    pub fn new(rows: &'a [TreeRow]) -> Self {
        Self {
            rows,
            active_route: None,
        }
    }

    pub fn active_route(mut self, route: Option<&'a str>) -> Self {
        self.active_route = route;
        self
    }

    fn render_activity_bar(area: Rect, buf: &mut Buffer, state: &SidebarState) {
        fill_bg(buf, area, BG_ACTIVITY);
        for (i, panel) in PanelId::ALL.iter().enumerate() {
            let y = area.y + (i as u16) * 2;
            if y >= area.bottom() {
                break;
            }
            let is_active = *panel == state.active;
            let style = if is_active {
                Style::default().fg(TEXT_BRIGHT)
            } else {
                Style::default().fg(TEXT_MUTED)
            };
            if is_active && !state.collapsed {
                buf[(area.x, y)].set_char('▎').set_fg(ACCENT_PRIMARY);
            }
            buf[(area.x + 1, y)].set_char(panel.icon()).set_style(style);
        }
    }

    fn panel_lines(&self, panel: PanelId) -> Vec<Line<'static>> {
        let muted = Style::default().fg(TEXT_MUTED);
        let text = Style::default().fg(TEXT_PRIMARY);
        let heading = muted.add_modifier(Modifier::BOLD);

        match panel {
            PanelId::Explorer => Vec::new(),
            PanelId::Search => vec![
                Line::styled("Search (mock) in workspace...", muted),
                Line::raw(""),
                Line::styled("No results.", text),
            ],
            PanelId::SourceControl => {
                let mut lines = vec![Line::from(vec![
                    Span::styled("CHANGES ", heading),
                    Span::styled(GIT_CHANGES.len().to_string(), muted),
                ])];
                for change in GIT_CHANGES {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{} ", change.status), Style::default().fg(ACCENT_WARNING)),
                        Span::styled(change.file, text),
                    ]));
                    lines.push(Line::styled(format!("  {}", change.path), muted));
                }
                lines.push(Line::raw(""));
                lines.push(Line::styled("HISTORY", heading));
                for (message, author, ago) in GIT_HISTORY {
                    lines.push(Line::styled(format!("● {}", message), text));
                    lines.push(Line::styled(format!("  {} · {}", author, ago), muted));
                }
                lines
            }
            PanelId::Debug => {
                let mut lines = vec![Line::styled("CONFIGURATIONS", heading)];
                for (name, request) in DEBUG_CONFIGS {
                    lines.push(Line::from(vec![
                        Span::styled("▷ ", Style::default().fg(ACCENT_SUCCESS)),
                        Span::styled(*name, text),
                        Span::styled(format!(" ({})", request), muted),
                    ]));
                }
                lines.push(Line::raw(""));
                lines.push(Line::styled("BREAKPOINTS", heading));
                for (file, line, enabled) in DEBUG_BREAKPOINTS {
                    let mark = if *enabled { "[x]" } else { "[ ]" };
                    lines.push(Line::styled(format!("{} {}:{}", mark, file, line), text));
                }
                lines
            }
            PanelId::Extensions => {
                let mut lines = Vec::new();
                for ext in EXTENSIONS {
                    let status = if ext.installed { "installed" } else { "install" };
                    lines.push(Line::from(vec![
                        Span::styled(ext.name, text.add_modifier(Modifier::BOLD)),
                        Span::styled(format!("  ★ {} ⤓ {}", ext.rating, ext.downloads), muted),
                    ]));
                    lines.push(Line::styled(format!("  {}", ext.description), muted));
                    lines.push(Line::styled(format!("  {} · {}", ext.author, status), muted));
                }
                lines
            }
        }
    }
}

impl StatefulWidget for Sidebar<'_> {
    type State = SidebarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width < ACTIVITY_BAR_WIDTH {
            return;
        }

        let activity = Rect::new(area.x, area.y, ACTIVITY_BAR_WIDTH, area.height);
        Self::render_activity_bar(activity, buf, state);

        if state.collapsed || area.width < ACTIVITY_BAR_WIDTH + 10 {
            return;
        }

        let panel_area = Rect::new(
            area.x + ACTIVITY_BAR_WIDTH,
            area.y,
            area.width - ACTIVITY_BAR_WIDTH,
            area.height,
        );
        fill_bg(buf, panel_area, BG_SIDEBAR);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SIDEBAR_HEADER_ROWS),
                Constraint::Min(1),
            ])
            .split(panel_area);

        let title_style = if state.focused {
            Style::default().fg(TEXT_BRIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_PRIMARY)
        };
        Paragraph::new(format!(" {}", state.active.label().to_uppercase()))
            .style(title_style)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(BORDER_DEFAULT)),
            )
            .render(chunks[0], buf);

        let body = chunks[1];
        if state.active == PanelId::Explorer {
            let selected_bg = if state.focused {
                SELECTED_BG
            } else {
                SELECTED_BG_DIM
            };
            TreeView::new(self.rows)
                .active_route(self.active_route)
                .selected_style(Style::default().bg(selected_bg))
                .render(body, buf, &mut state.tree_state);
        } else {
            let inner = Rect::new(body.x + 1, body.y, body.width.saturating_sub(1), body.height);
            Paragraph::new(self.panel_lines(state.active)).render(inner, buf);
        }
    }
}
