//! Top menu bar definitions and dropdown state

/// Top-level menus, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuId {
    File,
    Edit,
    Selection,
    View,
    Go,
    Run,
    Terminal,
    Help,
}

/// Every item reachable from the menu bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    NewFile,
    OpenFile,
    OpenFolder,
    Save,
    SaveAll,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    ExpandSelection,
    ShrinkSelection,
    CommandPalette,
    Appearance,
    ShowExplorer,
    ShowExtensions,
    GoBack,
    GoForward,
    GoToFile,
    GoToSymbol,
    RunWithoutDebugging,
    StartDebugging,
    RunTask,
    NewTerminal,
    SplitTerminal,
    Documentation,
    ReleaseNotes,
    About,
}

/// Result of dispatching a [`MenuAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Handled,
    Unsupported,
}

pub struct MenuDef {
    pub id: MenuId,
    pub label: &'static str,
    pub items: &'static [(&'static str, MenuAction)],
}

pub const MENU_DEFS: &[MenuDef] = &[
    MenuDef {
        id: MenuId::File,
        label: "File",
        items: &[
            ("New File", MenuAction::NewFile),
            ("Open File...", MenuAction::OpenFile),
            ("Open Folder...", MenuAction::OpenFolder),
            ("Save", MenuAction::Save),
            ("Save All", MenuAction::SaveAll),
        ],
    },
    MenuDef {
        id: MenuId::Edit,
        label: "Edit",
        items: &[
            ("Undo", MenuAction::Undo),
            ("Redo", MenuAction::Redo),
            ("Cut", MenuAction::Cut),
            ("Copy", MenuAction::Copy),
            ("Paste", MenuAction::Paste),
        ],
    },
    MenuDef {
        id: MenuId::Selection,
        label: "Selection",
        items: &[
            ("Select All", MenuAction::SelectAll),
            ("Expand Selection", MenuAction::ExpandSelection),
            ("Shrink Selection", MenuAction::ShrinkSelection),
        ],
    },
    MenuDef {
        id: MenuId::View,
        label: "View",
        items: &[
            ("Command Palette...", MenuAction::CommandPalette),
            ("Appearance", MenuAction::Appearance),
            ("Explorer", MenuAction::ShowExplorer),
            ("Extensions", MenuAction::ShowExtensions),
        ],
    },
    MenuDef {
        id: MenuId::Go,
        label: "Go",
        items: &[
            ("Back", MenuAction::GoBack),
            ("Forward", MenuAction::GoForward),
            ("Go to File...", MenuAction::GoToFile),
            ("Go to Symbol...", MenuAction::GoToSymbol),
        ],
    },
    MenuDef {
        id: MenuId::Run,
        label: "Run",
        items: &[
            ("Run Without Debugging", MenuAction::RunWithoutDebugging),
            ("Start Debugging", MenuAction::StartDebugging),
            ("Run Task...", MenuAction::RunTask),
        ],
    },
    MenuDef {
        id: MenuId::Terminal,
        label: "Terminal",
        items: &[
            ("New Terminal", MenuAction::NewTerminal),
            ("Split Terminal", MenuAction::SplitTerminal),
            ("Run Task...", MenuAction::RunTask),
        ],
    },
    MenuDef {
        id: MenuId::Help,
        label: "Help",
        items: &[
            ("Documentation", MenuAction::Documentation),
            ("Release Notes", MenuAction::ReleaseNotes),
            ("About", MenuAction::About),
        ],
    },
];

impl MenuId {
    pub fn def(self) -> &'static MenuDef {
        // MENU_DEFS is declared in enum order
        &MENU_DEFS[self.index()]
    }

    fn index(self) -> usize {
        match self {
            MenuId::File => 0,
            MenuId::Edit => 1,
            MenuId::Selection => 2,
            MenuId::View => 3,
            MenuId::Go => 4,
            MenuId::Run => 5,
            MenuId::Terminal => 6,
            MenuId::Help => 7,
        }
    }

    fn from_index(index: usize) -> Self {
        MENU_DEFS[index % MENU_DEFS.len()].id
    }
}

/// Which dropdown is open and which of its items is highlighted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuBarState {
    open: Option<MenuId>,
    highlighted: usize,
}

impl MenuBarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `id`, or close it if it is already open
    pub fn toggle_menu(&mut self, id: MenuId) {
        if self.open == Some(id) {
            self.close();
        } else {
            self.open = Some(id);
            self.highlighted = 0;
        }
    }

    pub fn close(&mut self) {
        self.open = None;
        self.highlighted = 0;
    }

    pub fn open_menu(&self) -> Option<MenuId> {
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Move the highlight within the open dropdown, wrapping around
    pub fn move_highlight(&mut self, step: isize) {
        let Some(id) = self.open else {
            return;
        };
        let len = id.def().items.len() as isize;
        self.highlighted = (self.highlighted as isize + step).rem_euclid(len) as usize;
    }

    /// Highlight an item of the open dropdown
    pub fn set_highlight(&mut self, index: usize) {
        if let Some(id) = self.open {
            if index < id.def().items.len() {
                self.highlighted = index;
            }
        }
    }

    /// Switch to the neighbouring menu, wrapping around
    pub fn move_menu(&mut self, step: isize) {
        let current = self.open.map(MenuId::index).unwrap_or(0) as isize;
        let len = MENU_DEFS.len() as isize;
        self.open = Some(MenuId::from_index((current + step).rem_euclid(len) as usize));
        self.highlighted = 0;
    }

    /// Close the dropdown and return the highlighted item's action
    pub fn activate(&mut self) -> Option<MenuAction> {
        let id = self.open?;
        let action = id
            .def()
            .items
            .get(self.highlighted)
            .map(|(_, action)| *action);
        self.close();
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defs_follow_enum_order() {
        for (i, def) in MENU_DEFS.iter().enumerate() {
            assert_eq!(def.id.index(), i);
            assert_eq!(def.id.def().label, def.label);
        }
    }

    #[test]
    fn test_toggle_menu() {
        let mut bar = MenuBarState::new();
        bar.toggle_menu(MenuId::File);
        assert_eq!(bar.open_menu(), Some(MenuId::File));

        bar.toggle_menu(MenuId::View);
        assert_eq!(bar.open_menu(), Some(MenuId::View));

        bar.toggle_menu(MenuId::View);
        assert_eq!(bar.open_menu(), None);
    }

    #[test]
    fn test_highlight_wraps_and_activates() {
        let mut bar = MenuBarState::new();
        bar.toggle_menu(MenuId::Help);
        bar.move_highlight(-1);
        assert_eq!(bar.highlighted(), 2);

        assert_eq!(bar.activate(), Some(MenuAction::About));
        assert!(!bar.is_open());
        assert_eq!(bar.activate(), None);
    }

    #[test]
    fn test_move_menu_wraps() {
        let mut bar = MenuBarState::new();
        bar.toggle_menu(MenuId::File);
        bar.move_menu(-1);
        assert_eq!(bar.open_menu(), Some(MenuId::Help));
        bar.move_menu(1);
        assert_eq!(bar.open_menu(), Some(MenuId::File));
    }
}
