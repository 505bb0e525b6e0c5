use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::ApiClient;
use crate::config::{Config, KeyCombo, KeyContext};
use crate::data::StateStorage;
use crate::ui::action::Action;
use crate::ui::components::{
    MenuBar, Notice, PageView, PanelId, Sidebar, StatusBar, TabBar, TabBarHitTarget, TerminalView,
    ACTIVITY_BAR_WIDTH, SIDEBAR_HEADER_ROWS,
};
use crate::ui::events::{AppEvent, Focus, Prompt, PromptKind};
use crate::ui::file_tree::NodeKind;
use crate::ui::menu::{MenuAction, MenuId, MenuOutcome};
use crate::ui::pages::find_page;
use crate::ui::poller::{spawn_poller, PollSpec, PollUpdate, PollerHandle, SequenceGen, SnapshotSource};
use crate::ui::shell::{Shell, API_CLIENT_ROUTE};
use crate::ui::terminal_guard::TerminalGuard;

/// Redraw cadence when nothing else happens
const TICK_RATE: Duration = Duration::from_millis(250);

/// Screen regions from the last draw, used for mouse hit testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppLayout {
    pub screen: Rect,
    pub menu_bar: Rect,
    /// Activity bar plus panel
    pub sidebar: Rect,
    /// Explorer rows inside the panel
    pub tree: Rect,
    pub tab_bar: Rect,
    pub page: Rect,
    pub terminal: Option<Rect>,
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(
        area: Rect,
        sidebar_width: u16,
        sidebar_collapsed: bool,
        terminal_height: Option<u16>,
    ) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let sidebar_width = if sidebar_collapsed {
            ACTIVITY_BAR_WIDTH
        } else {
            sidebar_width
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(rows[1]);
        let sidebar = columns[0];

        let mut editor_constraints = vec![Constraint::Length(1), Constraint::Min(1)];
        if let Some(height) = terminal_height {
            editor_constraints.push(Constraint::Length(height));
        }
        let editor = Layout::default()
            .direction(Direction::Vertical)
            .constraints(editor_constraints)
            .split(columns[1]);

        let tree = if sidebar_collapsed {
            Rect::default()
        } else {
            Rect::new(
                sidebar.x + ACTIVITY_BAR_WIDTH,
                sidebar.y + SIDEBAR_HEADER_ROWS,
                sidebar.width.saturating_sub(ACTIVITY_BAR_WIDTH),
                sidebar.height.saturating_sub(SIDEBAR_HEADER_ROWS),
            )
        };

        Self {
            screen: area,
            menu_bar: rows[0],
            sidebar,
            tree,
            tab_bar: editor[0],
            page: editor[1],
            terminal: terminal_height.map(|_| editor[2]),
            status: rows[2],
        }
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
}

/// Main application state
pub struct App {
    /// Application configuration
    config: Config,
    /// Tabs, sidebar, explorer, terminal and menus
    shell: Shell,
    /// Where the shell is saved on exit
    storage: Arc<dyn StateStorage>,
    /// Pane receiving unmodified keys
    focus: Focus,
    /// Status-line text field, if one is open
    prompt: Option<Prompt>,
    /// Transient status message
    notice: Option<Notice>,
    /// Scroll offset of the page body
    page_scroll: u16,
    /// Client for the API server
    client: Arc<ApiClient>,
    /// Fetch counter shared by every poller
    sequence: SequenceGen,
    /// Poller for the displayed route
    poller: Option<PollerHandle>,
    /// Regions from the last draw
    layout: AppLayout,
    should_quit: bool,
    /// Event channel sender
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Event channel receiver
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    poll_tx: mpsc::UnboundedSender<PollUpdate>,
    poll_rx: mpsc::UnboundedReceiver<PollUpdate>,
}

impl App {
    /// Build the app, restoring the shell from `storage`
    pub fn new(config: Config, storage: Arc<dyn StateStorage>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (poll_tx, poll_rx) = mpsc::unbounded_channel();
        let shell = Shell::restore(storage.as_ref(), config.shell);
        let client = Arc::new(ApiClient::new(config.api_url.clone(), config.client_timeout()));

        Self {
            config,
            shell,
            storage,
            focus: Focus::Editor,
            prompt: None,
            notice: None,
            page_scroll: 0,
            client,
            sequence: SequenceGen::new(),
            poller: None,
            layout: AppLayout::default(),
            should_quit: false,
            event_tx,
            event_rx,
            poll_tx,
            poll_rx,
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let input = Self::spawn_input_reader(self.event_tx.clone());
        let result = self.event_loop(&mut terminal).await;
        input.abort();
        self.poller = None;

        if let Err(err) = self.shell.save(self.storage.as_ref()) {
            tracing::error!(error = %err, "Failed to save shell state");
        }

        guard.cleanup()?;
        terminal.show_cursor()?;
        result
    }

    fn spawn_input_reader(tx: mpsc::UnboundedSender<AppEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            while let Some(event) = reader.next().await {
                match event {
                    Ok(event) => {
                        if tx.send(AppEvent::Input(event)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "Terminal input failed");
                        break;
                    }
                }
            }
            let _ = tx.send(AppEvent::Quit);
        })
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(TICK_RATE);
        loop {
            self.sync_poller();
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                _ = ticker.tick() => {}
                Some(event) = self.event_rx.recv() => {
                    self.handle_app_event(event);
                }
                Some(update) = self.poll_rx.recv() => self.handle_poll(update),
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Attach a poller for the displayed route, replacing one for another route
    fn sync_poller(&mut self) {
        let route = self.shell.route();
        if self.poller.as_ref().is_some_and(|p| p.route() == route) {
            return;
        }

        self.poller = find_page(route).and_then(|page| {
            let endpoint = page.endpoint?;
            let source: Arc<dyn SnapshotSource> = self.client.clone();
            Some(spawn_poller(
                source,
                PollSpec {
                    route: page.route.to_string(),
                    endpoint: endpoint.to_string(),
                    interval: page.interval,
                },
                self.sequence.clone(),
                self.poll_tx.clone(),
            ))
        });
    }

    /// Apply a page poller result to the shell
    pub fn handle_poll(&mut self, update: PollUpdate) {
        if !self.shell.apply_poll(update) {
            tracing::debug!(route = %self.shell.route(), "Poll result not applied");
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(Event::Key(key)) => self.handle_key(key),
            AppEvent::Input(Event::Mouse(mouse)) => self.handle_mouse(mouse),
            AppEvent::Input(_) => {}
            AppEvent::SendFinished(result) => self.shell.api_client.finish_send(result),
            AppEvent::RequestSaved(result) => match result {
                Ok(saved) => {
                    self.notice = Some(Notice::info(format!("Saved \"{}\"", saved.name)));
                    self.shell.api_client.apply_saved(saved);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Save request failed");
                    self.shell.api_client.report_error(err.to_string());
                }
            },
            AppEvent::RequestDeleted { id, result } => match result {
                Ok(_) => self.shell.api_client.apply_deleted(id),
                Err(err) => {
                    tracing::warn!(id, error = %err, "Delete request failed");
                    self.shell.api_client.report_error(err.to_string());
                }
            },
            AppEvent::Quit => self.should_quit = true,
        }
    }

    fn key_context(&self) -> KeyContext {
        KeyContext::resolve(self.focus, self.shell.menu.is_open(), self.prompt.is_some())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.notice = None;

        let context = self.key_context();
        let combo = KeyCombo::from_key_event(&key);
        if let Some(action) = self.config.keybindings.get_action(&combo, context).cloned() {
            tracing::trace!(?action, ?context, key = %combo, "Key bound");
            self.execute(action, context);
            return;
        }

        if !context.accepts_text() {
            return;
        }
        if let KeyCode::Char(c) = key.code {
            if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                return;
            }
            match (&mut self.prompt, context) {
                (Some(prompt), KeyContext::Prompt) => prompt.input.push(c),
                (_, KeyContext::Terminal) => self.shell.terminal.push_char(c),
                _ => {}
            }
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.shell.sidebar.set_focused(focus == Focus::Sidebar);
    }

    /// Drop focus from panes that are no longer on screen
    fn fix_focus(&mut self) {
        let hidden = match self.focus {
            Focus::Sidebar => self.shell.sidebar.is_collapsed(),
            Focus::Terminal => !self.shell.layout.is_terminal_open(),
            Focus::Editor => false,
        };
        if hidden {
            self.set_focus(Focus::Editor);
        }
    }

    fn on_api_client(&self) -> bool {
        self.shell.route() == API_CLIENT_ROUTE
    }

    /// Run an action in the context it was resolved in
    pub fn execute(&mut self, action: Action, context: KeyContext) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleSidebar => {
                let active = self.shell.sidebar.active();
                self.shell.sidebar.select_icon(active);
                self.fix_focus();
            }
            Action::ToggleTerminal => {
                self.shell.layout.toggle_terminal();
                if self.shell.layout.is_terminal_open() {
                    self.set_focus(Focus::Terminal);
                } else {
                    self.fix_focus();
                }
            }
            Action::GrowTerminal => self.shell.layout.resize_terminal(1),
            Action::ShrinkTerminal => self.shell.layout.resize_terminal(-1),
            Action::OpenMenu => self.shell.menu.toggle_menu(MenuId::File),
            Action::FocusNext => {
                let next = self.focus.next(
                    !self.shell.sidebar.is_collapsed(),
                    self.shell.layout.is_terminal_open(),
                );
                self.set_focus(next);
            }
            Action::ShowPanel(n) => {
                if let Some(panel) = n.checked_sub(1).and_then(|i| PanelId::ALL.get(i as usize)) {
                    self.show_panel(*panel);
                }
            }
            Action::NewFile => self.dispatch_menu(MenuAction::NewFile),
            Action::CloseTab => self.shell.close_current_tab(),
            Action::NextTab => self.shell.cycle_tab(1),
            Action::PrevTab => self.shell.cycle_tab(-1),
            Action::SwitchToTab(n) => {
                if n > 0 {
                    self.shell.click_tab_at(n as usize - 1);
                }
            }
            Action::SelectNext => self.select_step(1, context),
            Action::SelectPrev => self.select_step(-1, context),
            Action::Confirm => self.confirm(context),
            Action::Cancel => match context {
                KeyContext::Menu => self.shell.menu.close(),
                KeyContext::Prompt => self.prompt = None,
                _ => self.set_focus(Focus::Editor),
            },
            Action::AddFile | Action::AddFolder => {
                let parent = self.selected_parent();
                let kind = if action == Action::AddFile {
                    PromptKind::AddFile { parent }
                } else {
                    PromptKind::AddFolder { parent }
                };
                self.prompt = Some(Prompt::new(kind, ""));
            }
            Action::DeleteNode => self.delete_selected_node(),
            Action::ResetTree => {
                self.shell.reset_tree();
                self.notice = Some(Notice::info("Explorer reset"));
            }
            Action::MenuNext => self.shell.menu.move_menu(1),
            Action::MenuPrev => self.shell.menu.move_menu(-1),
            Action::Backspace => match context {
                KeyContext::Prompt => {
                    if let Some(prompt) = self.prompt.as_mut() {
                        prompt.input.pop();
                    }
                }
                _ => self.shell.terminal.backspace(),
            },
            Action::Submit => match context {
                KeyContext::Prompt => self.submit_prompt(),
                _ => self.shell.terminal.submit(),
            },
            // The next loop pass attaches a fresh poller
            Action::Refresh => self.poller = None,
            Action::CycleMethod => {
                if self.on_api_client() {
                    self.shell.api_client.cycle_method();
                }
            }
            Action::EditUrl => {
                if self.on_api_client() {
                    let url = self.shell.api_client.draft.url.clone();
                    self.prompt = Some(Prompt::new(PromptKind::DraftUrl, url));
                }
            }
            Action::EditBody => {
                if self.on_api_client() {
                    let body = single_line(&self.shell.api_client.draft.body);
                    self.prompt = Some(Prompt::new(PromptKind::DraftBody, body));
                }
            }
            Action::SendRequest => self.send_request(),
            Action::SaveRequest => self.save_request(),
            Action::DeleteRequest => self.delete_request(),
        }
    }

    /// Focus a panel that is already showing; otherwise behave like its icon
    fn show_panel(&mut self, panel: PanelId) {
        let sidebar = &mut self.shell.sidebar;
        let showing = sidebar.active() == panel && !sidebar.is_collapsed();
        if !showing || self.focus == Focus::Sidebar {
            sidebar.select_icon(panel);
        }
        if self.shell.sidebar.is_collapsed() {
            self.fix_focus();
        } else {
            self.set_focus(Focus::Sidebar);
        }
    }

    fn select_step(&mut self, step: isize, context: KeyContext) {
        match context {
            KeyContext::Menu => self.shell.menu.move_highlight(step),
            KeyContext::Sidebar => {
                let count = self.shell.visible_rows().len();
                let tree_state = &mut self.shell.sidebar.tree_state;
                if step > 0 {
                    tree_state.select_next(count);
                } else {
                    tree_state.select_previous(count);
                }
            }
            _ if self.on_api_client() => self.shell.api_client.select_step(step),
            _ => {
                self.page_scroll = if step > 0 {
                    self.page_scroll.saturating_add(1)
                } else {
                    self.page_scroll.saturating_sub(1)
                };
            }
        }
    }

    fn confirm(&mut self, context: KeyContext) {
        match context {
            KeyContext::Menu => {
                if let Some(action) = self.shell.menu.activate() {
                    self.dispatch_menu(action);
                }
            }
            KeyContext::Sidebar => {
                let index = self.shell.sidebar.tree_state.selected;
                if let Some(row) = self.shell.visible_rows().get(index).cloned() {
                    self.shell.activate_row(&row);
                    self.page_scroll = 0;
                }
            }
            _ => {}
        }
    }

    fn dispatch_menu(&mut self, action: MenuAction) {
        if self.shell.dispatch_menu(action) == MenuOutcome::Unsupported {
            self.notice = Some(Notice::warning(format!("{:?} is not available", action)));
        }
        if action == MenuAction::NewTerminal {
            self.set_focus(Focus::Terminal);
        } else {
            self.fix_focus();
        }
    }

    /// Folder that new explorer nodes go into: the selected folder, or the
    /// parent of the selected file
    fn selected_parent(&self) -> Vec<String> {
        let index = self.shell.sidebar.tree_state.selected;
        let rows = self.shell.visible_rows();
        let Some(mut path) = self.shell.row_path(index) else {
            return Vec::new();
        };
        if !rows.get(index).is_some_and(|row| row.is_folder) {
            path.pop();
        }
        path
    }

    fn delete_selected_node(&mut self) {
        let index = self.shell.sidebar.tree_state.selected;
        let Some(path) = self.shell.row_path(index) else {
            return;
        };
        let segments: Vec<&str> = path.iter().map(String::as_str).collect();
        self.notice = Some(match self.shell.delete_node(&segments) {
            Ok(_) => Notice::info(format!("Deleted {}", path.join("/"))),
            Err(err) => Notice::error(err.to_string()),
        });
    }

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        match prompt.kind {
            PromptKind::AddFile { parent } => self.add_node(parent, &prompt.input, NodeKind::File),
            PromptKind::AddFolder { parent } => {
                self.add_node(parent, &prompt.input, NodeKind::Folder)
            }
            PromptKind::DraftUrl => self.shell.api_client.draft.url = prompt.input,
            PromptKind::DraftBody => self.shell.api_client.draft.body = prompt.input,
        }
    }

    fn add_node(&mut self, parent: Vec<String>, name: &str, kind: NodeKind) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let mut path = parent;
        path.push(name.to_string());
        let segments: Vec<&str> = path.iter().map(String::as_str).collect();

        self.notice = Some(match self.shell.add_node_with_kind(&segments, kind) {
            Ok(()) => {
                for folder in &path[..path.len() - 1] {
                    if !self.shell.expansion.is_expanded(folder) {
                        self.shell.expansion.toggle_folder(folder);
                    }
                }
                Notice::info(format!("Created {}", path.join("/")))
            }
            Err(err) => Notice::error(err.to_string()),
        });
    }

    fn send_request(&mut self) {
        if !self.on_api_client() {
            return;
        }
        let Some(request) = self.shell.api_client.begin_send() else {
            return;
        };
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = client.send(&request).await;
            let _ = tx.send(AppEvent::SendFinished(result));
        });
    }

    fn save_request(&mut self) {
        if !self.on_api_client() {
            return;
        }
        let request = match self.shell.api_client.new_saved_request() {
            Ok(request) => request,
            Err(err) => {
                self.shell.api_client.report_error(err.to_string());
                return;
            }
        };
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = client.save_request(&request).await;
            let _ = tx.send(AppEvent::RequestSaved(result));
        });
    }

    fn delete_request(&mut self) {
        if !self.on_api_client() {
            return;
        }
        let Some(id) = self.shell.api_client.selected_id() else {
            return;
        };
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = client.delete_request(id).await;
            let _ = tx.send(AppEvent::RequestDeleted { id, result });
        });
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.click(x, y),
            MouseEventKind::ScrollUp if contains(self.layout.page, x, y) => {
                self.page_scroll = self.page_scroll.saturating_sub(3);
            }
            MouseEventKind::ScrollDown if contains(self.layout.page, x, y) => {
                self.page_scroll = self.page_scroll.saturating_add(3);
            }
            _ => {}
        }
    }

    fn click(&mut self, x: u16, y: u16) {
        let layout = self.layout;

        if self.shell.menu.is_open() {
            let item = MenuBar::new(&self.shell.menu).item_at(layout.menu_bar, layout.screen, x, y);
            if let Some(index) = item {
                self.shell.menu.set_highlight(index);
                if let Some(action) = self.shell.menu.activate() {
                    self.dispatch_menu(action);
                }
                return;
            }
            if !contains(layout.menu_bar, x, y) {
                self.shell.menu.close();
                return;
            }
        }

        if contains(layout.menu_bar, x, y) {
            if let Some(id) = MenuBar::hit_test(layout.menu_bar, x) {
                self.shell.menu.toggle_menu(id);
            }
        } else if contains(layout.sidebar, x, y) && x < layout.sidebar.x + ACTIVITY_BAR_WIDTH {
            let offset = y - layout.sidebar.y;
            if offset % 2 == 0 {
                if let Some(panel) = PanelId::ALL.get(offset as usize / 2) {
                    self.shell.sidebar.select_icon(*panel);
                    self.fix_focus();
                }
            }
        } else if contains(layout.tree, x, y) {
            self.set_focus(Focus::Sidebar);
            if !self.shell.sidebar.explorer_visible() {
                return;
            }
            let rows = self.shell.visible_rows();
            let tree_state = &mut self.shell.sidebar.tree_state;
            if let Some(index) = tree_state.index_at(y - layout.tree.y, rows.len()) {
                tree_state.selected = index;
                self.shell.activate_row(&rows[index]);
                self.page_scroll = 0;
            }
        } else if contains(layout.sidebar, x, y) {
            self.set_focus(Focus::Sidebar);
        } else if contains(layout.tab_bar, x, y) {
            self.set_focus(Focus::Editor);
            let tabs = self.shell.tabs.tabs();
            match TabBar::new(tabs, None).hit_test(layout.tab_bar, x) {
                Some(TabBarHitTarget::Tab(i)) => {
                    self.shell.click_tab_at(i);
                    self.page_scroll = 0;
                }
                Some(TabBarHitTarget::Close(i)) => {
                    if let Some(path) = tabs.get(i).map(|tab| tab.path.clone()) {
                        self.shell.close_tab(&path);
                    }
                }
                None => {}
            }
        } else if layout.terminal.is_some_and(|area| contains(area, x, y)) {
            self.set_focus(Focus::Terminal);
        } else if contains(layout.page, x, y) {
            self.set_focus(Focus::Editor);
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let terminal_height = self
            .shell
            .layout
            .is_terminal_open()
            .then(|| self.shell.layout.terminal_height());
        let layout = AppLayout::compute(
            f.area(),
            self.config.sidebar_width,
            self.shell.sidebar.is_collapsed(),
            terminal_height,
        );
        self.layout = layout;

        let route = self.shell.route().to_string();
        let title = self
            .shell
            .tabs
            .active_tab()
            .map(|tab| format!("{} - editor-shell", tab.label))
            .unwrap_or_else(|| "editor-shell".to_string());
        let rows = self.shell.visible_rows();

        f.render_stateful_widget(
            Sidebar::new(&rows).active_route(Some(route.as_str())),
            layout.sidebar,
            &mut self.shell.sidebar,
        );

        let buf = f.buffer_mut();
        MenuBar::new(&self.shell.menu)
            .title(&title)
            .render(layout.menu_bar, buf);

        TabBar::new(self.shell.tabs.tabs(), self.shell.tabs.active_index())
            .focused(self.focus == Focus::Editor)
            .render(layout.tab_bar, buf);

        let snapshot = self.shell.snapshot(&route);
        let mut page = PageView::new(&route, find_page(&route))
            .snapshot(snapshot)
            .scroll(self.page_scroll);
        if route == API_CLIENT_ROUTE {
            page = page.api_client(&self.shell.api_client);
        }
        f.render_widget(page, layout.page);

        if let Some(area) = layout.terminal {
            f.render_widget(
                TerminalView::new(&self.shell.terminal).focused(self.focus == Focus::Terminal),
                area,
            );
        }

        let (updated_at, poll_error) = snapshot
            .map(|slot| (slot.updated_at(), slot.last_error()))
            .unwrap_or((None, None));
        let buf = f.buffer_mut();
        StatusBar::new(&route, self.focus)
            .prompt(self.prompt.as_ref())
            .notice(self.notice.as_ref())
            .poll_state(updated_at, poll_error)
            .render(layout.status, buf);

        MenuBar::new(&self.shell.menu).render_dropdown(layout.menu_bar, layout.screen, buf);
    }
}

/// Collapse a body onto one line for the status-line editor
fn single_line(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .map(|value| value.to_string())
        .unwrap_or_else(|_| body.split_whitespace().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryStorage;
    use crate::ui::components::NoticeLevel;
    use crate::web::models::ApiEnvelope;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn app() -> App {
        App::new(Config::default(), Arc::new(MemoryStorage::new()))
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, x: u16, y: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn draw(app: &mut App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
    }

    #[test]
    fn test_layout_regions() {
        let layout = AppLayout::compute(Rect::new(0, 0, 100, 30), 30, false, Some(10));
        assert_eq!(layout.menu_bar, Rect::new(0, 0, 100, 1));
        assert_eq!(layout.sidebar, Rect::new(0, 1, 30, 28));
        assert_eq!(layout.tree, Rect::new(3, 3, 27, 26));
        assert_eq!(layout.tab_bar, Rect::new(30, 1, 70, 1));
        assert_eq!(layout.page, Rect::new(30, 2, 70, 17));
        assert_eq!(layout.terminal, Some(Rect::new(30, 19, 70, 10)));
        assert_eq!(layout.status, Rect::new(0, 29, 100, 1));

        let collapsed = AppLayout::compute(Rect::new(0, 0, 100, 30), 30, true, None);
        assert_eq!(collapsed.sidebar.width, ACTIVITY_BAR_WIDTH);
        assert_eq!(collapsed.tree, Rect::default());
        assert_eq!(collapsed.terminal, None);
    }

    #[test]
    fn test_explorer_keyboard_navigation() {
        let mut app = app();
        app.execute(Action::ShowPanel(1), KeyContext::Global);
        assert_eq!(app.focus(), Focus::Sidebar);

        // Rows start with the folders; walk to the first routed file and open it
        let target = app
            .shell()
            .visible_rows()
            .iter()
            .position(|row| row.route.is_some())
            .unwrap();
        for _ in 0..target {
            press(&mut app, KeyCode::Down);
        }
        let route = app.shell().visible_rows()[target].route.clone().unwrap();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.shell().route(), route);
        assert!(app.shell().tabs.contains(&route));
    }

    #[test]
    fn test_add_file_through_prompt() {
        let mut app = app();
        app.execute(Action::ShowPanel(1), KeyContext::Global);
        app.shell.sidebar.tree_state.selected = 0;
        let root = app.shell().visible_rows()[0].name.clone();

        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(
            app.prompt().map(|p| &p.kind),
            Some(PromptKind::AddFile { parent }) if parent == &vec![root.clone()]
        ));

        // Printable keys go to the prompt, not to sidebar bindings
        type_text(&mut app, "notes.md");
        press(&mut app, KeyCode::Enter);

        assert!(app.prompt().is_none());
        assert!(app.shell().tree.find(&[root.as_str(), "notes.md"]).is_some());
        assert_eq!(
            app.notice().map(|n| n.text.clone()),
            Some(format!("Created {}/notes.md", root))
        );
    }

    #[test]
    fn test_prompt_escape_discards() {
        let mut app = app();
        app.execute(Action::ShowPanel(1), KeyContext::Global);
        press(&mut app, KeyCode::Char('A'));
        type_text(&mut app, "tmp");
        press(&mut app, KeyCode::Esc);
        assert!(app.prompt().is_none());
        assert_eq!(app.focus(), Focus::Sidebar);
    }

    #[test]
    fn test_terminal_typing() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert!(app.shell().layout.is_terminal_open());
        assert_eq!(app.focus(), Focus::Terminal);

        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter);
        assert!(app
            .shell()
            .terminal
            .lines()
            .iter()
            .any(|line| line == "Hello, developer 👋"));

        app.handle_key(key(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert_eq!(app.focus(), Focus::Editor);
    }

    #[test]
    fn test_menu_keyboard_flow() {
        let mut app = app();
        press(&mut app, KeyCode::F(10));
        assert_eq!(app.shell().menu.open_menu(), Some(MenuId::File));

        // File > New File
        press(&mut app, KeyCode::Enter);
        assert!(!app.shell().menu.is_open());
        assert_eq!(app.shell().route(), "/untitled-1");

        // File > Open File... is not wired up
        press(&mut app, KeyCode::F(10));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.notice().map(|n| n.level), Some(NoticeLevel::Warning));
    }

    #[test]
    fn test_tab_shortcuts() {
        let mut app = app();
        app.shell.navigate("/dashboard");
        app.shell.navigate("/health");

        app.handle_key(key(KeyCode::Char('1'), KeyModifiers::ALT));
        assert_eq!(app.shell().route(), "/");

        app.handle_key(key(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(app.shell().route(), "/dashboard");
        assert_eq!(app.shell().tabs.len(), 2);
    }

    #[test]
    fn test_api_client_actions_need_its_route() {
        let mut app = app();
        app.execute(Action::EditUrl, KeyContext::Editor);
        assert!(app.prompt().is_none());

        app.shell.navigate(API_CLIENT_ROUTE);
        app.execute(Action::EditUrl, KeyContext::Editor);
        let prompt = app.prompt().unwrap();
        assert_eq!(prompt.kind, PromptKind::DraftUrl);
        assert_eq!(prompt.input, app.shell().api_client.draft.url);

        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "/1");
        press(&mut app, KeyCode::Enter);
        assert!(app.shell().api_client.draft.url.ends_with("/user/1"));
    }

    #[test]
    fn test_invalid_draft_reports_without_sending() {
        let mut app = app();
        app.shell.navigate(API_CLIENT_ROUTE);
        app.shell.api_client.draft.url = "not a url".into();

        // Validation fails before any task is spawned
        app.execute(Action::SendRequest, KeyContext::Editor);
        assert!(!app.shell().api_client.is_sending());
        assert!(app.shell().api_client.error().is_some());
    }

    #[test]
    fn test_body_is_edited_on_one_line() {
        assert_eq!(single_line("{\n  \"a\": 1\n}"), "{\"a\":1}");
        assert_eq!(single_line("not\njson"), "not json");
    }

    #[test]
    fn test_mouse_clicks() {
        let mut app = app();
        app.shell.navigate("/dashboard");
        draw(&mut app);

        // Tabs: " home × │" at 30..39, glyph at 36
        click(&mut app, 32, 1);
        assert_eq!(app.shell().route(), "/");
        click(&mut app, 36, 1);
        assert_eq!(app.shell().tabs.labels(), vec!["dashboard"]);
        assert_eq!(app.shell().route(), "/dashboard");

        // Activity bar: search icon on the third row of the sidebar
        click(&mut app, 1, 3);
        assert_eq!(app.shell().sidebar.active(), PanelId::Search);
        click(&mut app, 1, 3);
        assert!(app.shell().sidebar.is_collapsed());

        // Menu title then an item in its dropdown
        click(&mut app, 2, 0);
        assert_eq!(app.shell().menu.open_menu(), Some(MenuId::File));
        click(&mut app, 3, 2);
        assert!(!app.shell().menu.is_open());
        assert_eq!(app.shell().route(), "/untitled-1");
    }

    #[test]
    fn test_draw_shows_chrome() {
        let mut app = app();
        let terminal = draw(&mut app);
        let buffer = terminal.backend().buffer();

        let row = |y: u16, from: u16| -> String {
            (from..100).map(|x| buffer[(x, y)].symbol().to_string()).collect()
        };
        assert!(row(0, 0).starts_with("  File  Edit"));
        assert!(row(0, 0).contains("home - editor-shell"));
        assert!(row(1, 30).starts_with(" home × │"));
        assert!(row(1, 3).starts_with(" EXPLORER"));
        assert!(row(29, 0).starts_with(" EDITOR "));
    }

    #[test]
    fn test_show_panel_focuses_then_toggles() {
        let mut app = app();
        app.execute(Action::ShowPanel(1), KeyContext::Global);
        assert_eq!(app.focus(), Focus::Sidebar);
        assert!(!app.shell().sidebar.is_collapsed());

        app.execute(Action::ShowPanel(1), KeyContext::Global);
        assert!(app.shell().sidebar.is_collapsed());
        assert_eq!(app.focus(), Focus::Editor);

        app.execute(Action::ShowPanel(5), KeyContext::Global);
        assert_eq!(app.shell().sidebar.active(), PanelId::Extensions);
        assert_eq!(app.focus(), Focus::Sidebar);
    }

    #[test]
    fn test_poll_results_reach_api_client() {
        let mut app = app();
        app.shell.navigate("/api-client");
        app.handle_poll(PollUpdate {
            route: "/api-client".to_string(),
            seq: 1,
            result: Ok(ApiEnvelope::ok(json!([
                { "id": 7, "name": "Ping", "method": "GET", "url": "https://a.test/ping" }
            ]))),
        });

        assert_eq!(app.shell().api_client.requests().len(), 1);
        assert_eq!(app.shell().api_client.selected_id(), Some(7));
    }
}
