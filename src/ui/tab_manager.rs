use serde::{Deserialize, Serialize};

/// Label used for the root route
const ROOT_LABEL: &str = "home";

/// Label used when no path segment can be extracted
const FALLBACK_LABEL: &str = "untitled";

/// One open document in the shell, keyed by its route path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Route path ("/", "/dashboard", "/docs/intro", ...)
    pub path: String,
    /// Display name, fixed when the tab is created
    pub label: String,
}

impl Tab {
    pub fn new(path: impl Into<String>, label: Option<&str>) -> Self {
        let path = path.into();
        let label = label
            .map(str::to_string)
            .unwrap_or_else(|| derive_label(&path));
        Self { path, label }
    }
}

/// Derive a tab label from a route path.
///
/// `"/"` becomes `"home"`; otherwise the last non-empty `/` segment is used,
/// falling back to `"untitled"`.
pub fn derive_label(path: &str) -> String {
    if path == "/" {
        return ROOT_LABEL.to_string();
    }

    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or(FALLBACK_LABEL)
        .to_string()
}

/// Ordered registry of open tabs plus the active tab pointer.
///
/// The active path is a weak reference: it never creates or deletes tabs.
/// None of the operations fail; missing targets degrade to no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabManager {
    tabs: Vec<Tab>,
    active_path: Option<String>,
}

impl TabManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted state.
    ///
    /// Duplicate paths keep their first occurrence and an active path that no
    /// longer names an open tab is cleared.
    pub fn from_persisted(persisted: TabManager) -> Self {
        let mut tabs: Vec<Tab> = Vec::with_capacity(persisted.tabs.len());
        for tab in persisted.tabs {
            if tabs.iter().any(|t| t.path == tab.path) {
                tracing::debug!(path = %tab.path, "Dropping duplicate persisted tab");
                continue;
            }
            tabs.push(tab);
        }

        let active_path = persisted
            .active_path
            .filter(|path| tabs.iter().any(|t| &t.path == path));

        Self { tabs, active_path }
    }

    /// Open a tab for `path`, or activate it if it is already open.
    ///
    /// New tabs are appended; existing tabs keep their position and label.
    pub fn open_tab(&mut self, path: &str, label: Option<&str>) {
        if !self.contains(path) {
            self.tabs.push(Tab::new(path, label));
        }
        self.active_path = Some(path.to_string());
    }

    /// Close the tab for `path` and return the resulting active path.
    ///
    /// When the closed tab was active, the tab that shifted into its index
    /// becomes active; if it was the last tab, the new last tab does. Closing
    /// an unknown path changes nothing.
    pub fn close_tab(&mut self, path: &str) -> Option<String> {
        let Some(index) = self.position(path) else {
            return self.active_path.clone();
        };

        self.tabs.remove(index);

        if self.active_path.as_deref() == Some(path) {
            self.active_path = self
                .tabs
                .get(index)
                .or_else(|| self.tabs.last())
                .map(|tab| tab.path.clone());
        }

        self.active_path.clone()
    }

    /// Set the active path without checking that a tab exists for it
    pub fn set_active_tab(&mut self, path: &str) {
        if !self.contains(path) {
            tracing::warn!(path = %path, "Activating a path with no open tab");
        }
        self.active_path = Some(path.to_string());
    }

    /// Activate the tab after the active one, wrapping around
    pub fn next_tab(&mut self) -> Option<&str> {
        self.cycle(1)
    }

    /// Activate the tab before the active one, wrapping around
    pub fn prev_tab(&mut self) -> Option<&str> {
        self.cycle(-1)
    }

    fn cycle(&mut self, step: isize) -> Option<&str> {
        if self.tabs.is_empty() {
            return None;
        }

        let len = self.tabs.len() as isize;
        let next = match self.active_index() {
            Some(current) => (current as isize + step).rem_euclid(len),
            None => 0,
        } as usize;

        self.active_path = Some(self.tabs[next].path.clone());
        self.active_path.as_deref()
    }

    /// Get the current active path
    pub fn active_path(&self) -> Option<&str> {
        self.active_path.as_deref()
    }

    /// Get the index of the active tab, if it is open
    pub fn active_index(&self) -> Option<usize> {
        self.active_path
            .as_deref()
            .and_then(|path| self.position(path))
    }

    /// Get the active tab, if it is open
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_index().map(|i| &self.tabs[i])
    }

    pub fn position(&self, path: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.position(path).is_some()
    }

    /// Get all tabs in display order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Get tab labels for display
    pub fn labels(&self) -> Vec<&str> {
        self.tabs.iter().map(|tab| tab.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}
