//! The editor shell: tabs, sidebar, explorer, terminal and menus bound to
//! the current route.

use std::collections::HashMap;

use crate::data::{load_json, save_json, StateStorage, StorageError, FILE_TREE_STORAGE_KEY, TABS_STORAGE_KEY};

use super::api_client::ApiClientPage;
use super::components::sidebar::{PanelId, SidebarState};
use super::file_tree::{FileNode, FileTree, FolderExpansion, NodeKind, TreeError, TreeRow};
use super::layout::LayoutState;
use super::menu::{MenuAction, MenuBarState, MenuOutcome};
use super::poller::{PollUpdate, SnapshotSlot};
use super::tab_manager::TabManager;
use super::terminal_pane::TerminalPane;

/// Route shown when no tab is left
pub const HOME_ROUTE: &str = "/";

/// Route opened by Help > About
pub const WELCOME_ROUTE: &str = "/welcome";

/// Route of the API client page
pub const API_CLIENT_ROUTE: &str = "/api-client";

const UNTITLED_PREFIX: &str = "/untitled-";

/// Startup options for a [`Shell`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOptions {
    /// Reopen the persisted tabs
    pub restore_tabs: bool,
    pub terminal_open: bool,
    pub terminal_height: u16,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            restore_tabs: true,
            terminal_open: false,
            terminal_height: super::layout::DEFAULT_TERMINAL_HEIGHT,
        }
    }
}

/// Complete shell state, owned by the UI task
#[derive(Debug)]
pub struct Shell {
    pub tabs: TabManager,
    pub sidebar: SidebarState,
    pub expansion: FolderExpansion,
    pub tree: FileTree,
    pub layout: LayoutState,
    pub terminal: TerminalPane,
    pub menu: MenuBarState,
    pub api_client: ApiClientPage,
    route: String,
    snapshots: HashMap<String, SnapshotSlot>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellOptions::default())
    }
}

impl Shell {
    /// A fresh shell on the home route
    pub fn new(options: ShellOptions) -> Self {
        let mut shell = Self {
            tabs: TabManager::new(),
            sidebar: SidebarState::new(),
            expansion: FolderExpansion::with_defaults(),
            tree: FileTree::initial(),
            layout: LayoutState::new(options.terminal_open, options.terminal_height),
            terminal: TerminalPane::new(),
            menu: MenuBarState::new(),
            api_client: ApiClientPage::new(),
            route: HOME_ROUTE.to_string(),
            snapshots: HashMap::new(),
        };
        shell.navigate(HOME_ROUTE);
        shell
    }

    /// Build a shell from persisted state.
    ///
    /// Unreadable entries are logged and replaced with defaults.
    pub fn restore(storage: &dyn StateStorage, options: ShellOptions) -> Self {
        let mut shell = Self::new(options);

        match load_json::<FileTree>(storage, FILE_TREE_STORAGE_KEY) {
            Ok(Some(tree)) => shell.tree = tree,
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "Failed to load file tree, using default"),
        }

        if options.restore_tabs {
            match load_json::<TabManager>(storage, TABS_STORAGE_KEY) {
                Ok(Some(persisted)) => {
                    shell.tabs = TabManager::from_persisted(persisted);
                    let route = shell
                        .tabs
                        .active_path()
                        .unwrap_or(HOME_ROUTE)
                        .to_string();
                    shell.navigate(&route);
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "Failed to load tabs, starting fresh"),
            }
        }

        tracing::debug!(tabs = shell.tabs.len(), route = %shell.route, "Shell restored");
        shell
    }

    /// Persist tabs and the file tree
    pub fn save(&self, storage: &dyn StateStorage) -> Result<(), StorageError> {
        save_json(storage, TABS_STORAGE_KEY, &self.tabs)?;
        save_json(storage, FILE_TREE_STORAGE_KEY, &self.tree)?;
        Ok(())
    }

    /// The route currently displayed
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Show `route` and open (or activate) its tab
    pub fn navigate(&mut self, route: &str) {
        if self.route != route {
            tracing::debug!(from = %self.route, to = %route, "Navigating");
            self.route = route.to_string();
        }
        self.tabs.open_tab(route, None);
    }

    /// Activate a tab and show its route
    pub fn click_tab(&mut self, path: &str) {
        self.tabs.set_active_tab(path);
        if path != self.route {
            self.navigate(path);
        }
    }

    /// Activate the tab at `index` in display order
    pub fn click_tab_at(&mut self, index: usize) {
        if let Some(path) = self.tabs.tabs().get(index).map(|tab| tab.path.clone()) {
            self.click_tab(&path);
        }
    }

    /// Close a tab; closing the displayed one moves to the new active tab or home
    pub fn close_tab(&mut self, path: &str) {
        let next = self.tabs.close_tab(path);
        if path == self.route {
            let target = next.unwrap_or_else(|| HOME_ROUTE.to_string());
            self.navigate(&target);
        }
    }

    /// Close the tab of the displayed route
    pub fn close_current_tab(&mut self) {
        let route = self.route.clone();
        self.close_tab(&route);
    }

    /// Cycle tabs forward (`step > 0`) or backward and show the result
    pub fn cycle_tab(&mut self, step: isize) {
        let target = if step >= 0 {
            self.tabs.next_tab()
        } else {
            self.tabs.prev_tab()
        }
        .map(str::to_string);

        if let Some(target) = target {
            self.navigate(&target);
        }
    }

    /// Activate an explorer row: folders toggle, routed files navigate
    pub fn activate_row(&mut self, row: &TreeRow) {
        if row.is_folder {
            self.expansion.toggle_folder(&row.name);
        } else if let Some(route) = &row.route {
            self.navigate(route);
        } else {
            tracing::debug!(file = %row.name, "File has no route");
        }
    }

    /// Explorer rows under the current expansion
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        self.tree.visible_rows(&self.expansion)
    }

    /// Segment path of the visible row at `index`
    pub fn row_path(&self, index: usize) -> Option<Vec<String>> {
        let rows = self.visible_rows();
        let target = rows.get(index)?;
        let mut path = vec![target.name.clone()];
        let mut depth = target.depth;
        for row in rows[..index].iter().rev() {
            if depth == 0 {
                break;
            }
            if row.depth == depth - 1 {
                path.push(row.name.clone());
                depth = row.depth;
            }
        }
        path.reverse();
        Some(path)
    }

    pub fn add_node(&mut self, path: &[&str]) -> Result<(), TreeError> {
        self.tree.add_node(path).inspect_err(|err| {
            tracing::warn!(error = %err, "Failed to add tree node");
        })
    }

    pub fn add_node_with_kind(&mut self, path: &[&str], kind: NodeKind) -> Result<(), TreeError> {
        self.tree.add_node_with_kind(path, kind).inspect_err(|err| {
            tracing::warn!(error = %err, "Failed to add tree node");
        })
    }

    pub fn delete_node(&mut self, path: &[&str]) -> Result<FileNode, TreeError> {
        self.tree.delete_node(path).inspect_err(|err| {
            tracing::warn!(error = %err, "Failed to delete tree node");
        })
    }

    pub fn reset_tree(&mut self) {
        self.tree.reset();
    }

    /// Next `/untitled-N` route with no open tab
    pub fn next_untitled_route(&self) -> String {
        (1..)
            .map(|n| format!("{}{}", UNTITLED_PREFIX, n))
            .find(|route| !self.tabs.contains(route))
            .unwrap_or_else(|| format!("{}0", UNTITLED_PREFIX))
    }

    /// Run a menu item against the shell
    pub fn dispatch_menu(&mut self, action: MenuAction) -> MenuOutcome {
        self.menu.close();
        match action {
            MenuAction::NewFile => {
                let route = self.next_untitled_route();
                self.navigate(&route);
            }
            MenuAction::ShowExplorer => self.sidebar.show(PanelId::Explorer),
            MenuAction::ShowExtensions => self.sidebar.show(PanelId::Extensions),
            MenuAction::GoBack => self.cycle_tab(-1),
            MenuAction::GoForward => self.cycle_tab(1),
            MenuAction::NewTerminal => self.layout.open_terminal(),
            MenuAction::About => self.navigate(WELCOME_ROUTE),
            other => {
                tracing::info!(action = ?other, "Menu action not supported");
                return MenuOutcome::Unsupported;
            }
        }
        MenuOutcome::Handled
    }

    /// Snapshot for a page route
    pub fn snapshot(&self, route: &str) -> Option<&SnapshotSlot> {
        self.snapshots.get(route)
    }

    /// Apply a poll result to its page's snapshot
    pub fn apply_poll(&mut self, update: PollUpdate) -> bool {
        let slot = self.snapshots.entry(update.route.clone()).or_default();
        let changed = slot.apply(update.seq, update.result);
        if changed && update.route == API_CLIENT_ROUTE {
            self.api_client.sync_requests(slot.data());
        }
        changed
    }
}
