//! Actions that can be triggered by keybindings
//!
//! Each action is a single operation on the shell. Keybindings map key
//! combos to actions per [`KeyContext`](crate::config::KeyContext).

use serde::{Deserialize, Serialize};

/// All mappable UI actions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // ========== Global Actions ==========
    /// Quit the application
    Quit,
    /// Collapse or restore the sidebar
    ToggleSidebar,
    /// Show or hide the terminal pane
    ToggleTerminal,
    /// Grow the terminal pane by one row
    GrowTerminal,
    /// Shrink the terminal pane by one row
    ShrinkTerminal,
    /// Open the menu bar on the first menu
    OpenMenu,
    /// Move focus to the next pane
    FocusNext,
    /// Show a sidebar panel by activity bar position (1-5)
    ShowPanel(u8),
    /// Open a new untitled tab
    NewFile,

    // ========== Tab Management ==========
    /// Close the current tab
    CloseTab,
    /// Switch to next tab
    NextTab,
    /// Switch to previous tab
    PrevTab,
    /// Switch to tab by number (1-9)
    SwitchToTab(u8),

    // ========== List/Tree Navigation ==========
    /// Select next item in list
    SelectNext,
    /// Select previous item in list
    SelectPrev,
    /// Confirm current selection
    Confirm,
    /// Cancel current mode or leave the focused pane
    Cancel,

    // ========== Explorer ==========
    /// Prompt for a file name under the selected folder
    AddFile,
    /// Prompt for a folder name under the selected folder
    AddFolder,
    /// Delete the selected node
    DeleteNode,
    /// Restore the initial file tree
    ResetTree,

    // ========== Menu Bar ==========
    /// Open the menu to the right
    MenuNext,
    /// Open the menu to the left
    MenuPrev,

    // ========== Text Input ==========
    /// Delete character before cursor
    Backspace,
    /// Submit the current input
    Submit,

    // ========== Pages ==========
    /// Refetch the current page now
    Refresh,
    /// Cycle the API client draft method
    CycleMethod,
    /// Edit the API client draft url
    EditUrl,
    /// Edit the API client draft body
    EditBody,
    /// Send the API client draft through the proxy
    SendRequest,
    /// Save the API client draft
    SaveRequest,
    /// Delete the selected saved request
    DeleteRequest,
}

impl Action {
    /// Get a human-readable description of the action
    pub fn description(&self) -> &'static str {
        match self {
            // Global
            Action::Quit => "Quit application",
            Action::ToggleSidebar => "Toggle sidebar",
            Action::ToggleTerminal => "Toggle terminal",
            Action::GrowTerminal => "Grow terminal",
            Action::ShrinkTerminal => "Shrink terminal",
            Action::OpenMenu => "Open menu",
            Action::FocusNext => "Focus next pane",
            Action::ShowPanel(_) => "Show panel",
            Action::NewFile => "New file",

            // Tab management
            Action::CloseTab => "Close tab",
            Action::NextTab => "Next tab",
            Action::PrevTab => "Previous tab",
            Action::SwitchToTab(_) => "Switch to tab",

            // Navigation
            Action::SelectNext => "Select next",
            Action::SelectPrev => "Select previous",
            Action::Confirm => "Confirm",
            Action::Cancel => "Cancel",

            // Explorer
            Action::AddFile => "New file here",
            Action::AddFolder => "New folder here",
            Action::DeleteNode => "Delete",
            Action::ResetTree => "Reset tree",

            // Menu
            Action::MenuNext => "Next menu",
            Action::MenuPrev => "Previous menu",

            // Input
            Action::Backspace => "Backspace",
            Action::Submit => "Submit",

            // Pages
            Action::Refresh => "Refresh",
            Action::CycleMethod => "Cycle method",
            Action::EditUrl => "Edit url",
            Action::EditBody => "Edit body",
            Action::SendRequest => "Send",
            Action::SaveRequest => "Save request",
            Action::DeleteRequest => "Delete request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_are_snake_case() {
        let json = serde_json::to_string(&Action::ToggleTerminal).unwrap();
        assert_eq!(json, "\"toggle_terminal\"");

        let action: Action = serde_json::from_str("\"send_request\"").unwrap();
        assert_eq!(action, Action::SendRequest);
    }
}
