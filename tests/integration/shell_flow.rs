//! Integration tests for shell state persistence and the tab scenarios
//!
//! Drives a [`Shell`] against SQLite-backed storage the way the app does
//! across restarts.

use super::common::create_test_storage;
use editor_shell::data::{load_json, FILE_TREE_STORAGE_KEY, TABS_STORAGE_KEY};
use editor_shell::ui::file_tree::{FileTree, NodeKind};
use editor_shell::{Shell, ShellOptions, StateStorage, TabManager};

fn paths(tabs: &TabManager) -> Vec<&str> {
    tabs.tabs().iter().map(|t| t.path.as_str()).collect()
}

/// Open three tabs, close a background one, then close the active last one
#[test]
fn test_open_and_close_scenario() {
    let mut tabs = TabManager::new();
    tabs.open_tab("/a", None);
    tabs.open_tab("/b", None);
    tabs.open_tab("/c", None);
    assert_eq!(paths(&tabs), vec!["/a", "/b", "/c"]);
    assert_eq!(tabs.active_path(), Some("/c"));

    let active = tabs.close_tab("/b");
    assert_eq!(paths(&tabs), vec!["/a", "/c"]);
    assert_eq!(active.as_deref(), Some("/c"));

    let active = tabs.close_tab("/c");
    assert_eq!(paths(&tabs), vec!["/a"]);
    assert_eq!(active.as_deref(), Some("/a"));
}

/// Tabs and explorer edits survive a restart through the database
#[test]
fn test_state_round_trips_through_database() {
    let (storage, _dir) = create_test_storage();

    let mut shell = Shell::restore(&storage, ShellOptions::default());
    shell.navigate("/dashboard");
    shell.navigate("/health");
    shell.click_tab("/dashboard");
    shell
        .add_node_with_kind(&["src", "notes"], NodeKind::Folder)
        .expect("add folder");
    shell.add_node(&["src", "notes", "todo.md"]).expect("add file");
    shell.delete_node(&["README.md"]).expect("delete file");
    shell.save(&storage).expect("save shell");

    let restored = Shell::restore(&storage, ShellOptions::default());
    assert_eq!(paths(&restored.tabs), vec!["/", "/dashboard", "/health"]);
    assert_eq!(restored.route(), "/dashboard");
    assert!(restored.tree.find(&["src", "notes", "todo.md"]).is_some());
    assert!(restored.tree.find(&["README.md"]).is_none());

    // The stored shapes are plain JSON under the well-known keys
    let stored_tabs: Option<TabManager> = load_json(&storage, TABS_STORAGE_KEY).unwrap();
    assert_eq!(stored_tabs.unwrap().active_path(), Some("/dashboard"));
    let stored_tree: Option<FileTree> = load_json(&storage, FILE_TREE_STORAGE_KEY).unwrap();
    assert_eq!(stored_tree.as_ref(), Some(&restored.tree));
}

/// Corrupt entries fall back to defaults instead of failing startup
#[test]
fn test_corrupt_state_falls_back() {
    let (storage, _dir) = create_test_storage();
    storage
        .set(TABS_STORAGE_KEY, &serde_json::json!({ "tabs": "nope" }))
        .unwrap();
    storage
        .set(FILE_TREE_STORAGE_KEY, &serde_json::json!(42))
        .unwrap();

    let shell = Shell::restore(&storage, ShellOptions::default());
    assert_eq!(shell.route(), "/");
    assert_eq!(shell.tabs.labels(), vec!["home"]);
    assert_eq!(shell.tree, FileTree::initial());
}

/// With tab restore off only the tree comes back
#[test]
fn test_restore_tabs_disabled() {
    let (storage, _dir) = create_test_storage();
    let mut shell = Shell::restore(&storage, ShellOptions::default());
    shell.navigate("/metrics");
    shell.reset_tree();
    shell.delete_node(&["public"]).unwrap();
    shell.save(&storage).unwrap();

    let options = ShellOptions {
        restore_tabs: false,
        ..ShellOptions::default()
    };
    let restored = Shell::restore(&storage, options);
    assert_eq!(paths(&restored.tabs), vec!["/"]);
    assert!(restored.tree.find(&["public"]).is_none());
}
