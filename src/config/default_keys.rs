//! Default keybindings
//!
//! These are used when no user configuration is present; user bindings from
//! `config.toml` are merged on top.

use std::collections::HashMap;

use super::keys::{KeyCombo, KeyContext, KeybindingConfig};
use crate::ui::action::Action;

/// Helper to insert a keybinding
fn bind(map: &mut HashMap<KeyCombo, Action>, key: &str, action: Action) {
    match key.parse() {
        Ok(combo) => {
            map.insert(combo, action);
        }
        Err(err) => tracing::warn!(key, error = %err, "Skipping invalid default keybinding"),
    }
}

/// Create the default keybindings configuration
pub fn default_keybindings() -> KeybindingConfig {
    let mut config = KeybindingConfig::new();

    // ========== Global Keybindings ==========
    // Global keys always carry a modifier or are non-printable so text
    // contexts keep every printable key.
    let global = &mut config.global;

    bind(global, "C-q", Action::Quit);
    bind(global, "C-b", Action::ToggleSidebar);
    bind(global, "C-t", Action::ToggleTerminal);
    bind(global, "<C-Up>", Action::GrowTerminal);
    bind(global, "<C-Down>", Action::ShrinkTerminal);
    bind(global, "<F10>", Action::OpenMenu);
    bind(global, "<Tab>", Action::FocusNext);
    bind(global, "C-n", Action::NewFile);
    bind(global, "C-w", Action::CloseTab);
    bind(global, "M-l", Action::NextTab);
    bind(global, "M-h", Action::PrevTab);
    bind(global, "<C-Right>", Action::NextTab);
    bind(global, "<C-Left>", Action::PrevTab);

    // Alt+1-9 for tab switching
    for i in 1..=9u8 {
        bind(global, &format!("M-{}", i), Action::SwitchToTab(i));
    }

    // F1-F5 select activity bar panels
    for i in 1..=5u8 {
        bind(global, &format!("<F{}>", i), Action::ShowPanel(i));
    }

    // ========== Sidebar ==========
    let sidebar = config.context.entry(KeyContext::Sidebar).or_default();

    bind(sidebar, "<Up>", Action::SelectPrev);
    bind(sidebar, "<Down>", Action::SelectNext);
    bind(sidebar, "k", Action::SelectPrev);
    bind(sidebar, "j", Action::SelectNext);
    bind(sidebar, "<CR>", Action::Confirm);
    bind(sidebar, "l", Action::Confirm);
    bind(sidebar, "<Esc>", Action::Cancel);
    bind(sidebar, "a", Action::AddFile);
    bind(sidebar, "A", Action::AddFolder);
    bind(sidebar, "d", Action::DeleteNode);
    bind(sidebar, "R", Action::ResetTree);

    // ========== Editor ==========
    let editor = config.context.entry(KeyContext::Editor).or_default();

    bind(editor, "<Up>", Action::SelectPrev);
    bind(editor, "<Down>", Action::SelectNext);
    bind(editor, "k", Action::SelectPrev);
    bind(editor, "j", Action::SelectNext);
    bind(editor, "r", Action::Refresh);
    bind(editor, "m", Action::CycleMethod);
    bind(editor, "u", Action::EditUrl);
    bind(editor, "b", Action::EditBody);
    bind(editor, "<CR>", Action::SendRequest);
    bind(editor, "s", Action::SendRequest);
    bind(editor, "w", Action::SaveRequest);
    bind(editor, "d", Action::DeleteRequest);

    // ========== Terminal ==========
    let terminal = config.context.entry(KeyContext::Terminal).or_default();

    bind(terminal, "<CR>", Action::Submit);
    bind(terminal, "<BS>", Action::Backspace);
    bind(terminal, "<Esc>", Action::Cancel);

    // ========== Menu ==========
    let menu = config.context.entry(KeyContext::Menu).or_default();

    bind(menu, "<Up>", Action::SelectPrev);
    bind(menu, "<Down>", Action::SelectNext);
    bind(menu, "<Left>", Action::MenuPrev);
    bind(menu, "<Right>", Action::MenuNext);
    bind(menu, "<CR>", Action::Confirm);
    bind(menu, "<Esc>", Action::Cancel);
    bind(menu, "<F10>", Action::Cancel);

    // ========== Prompt ==========
    let prompt = config.context.entry(KeyContext::Prompt).or_default();

    bind(prompt, "<CR>", Action::Submit);
    bind(prompt, "<BS>", Action::Backspace);
    bind(prompt, "<Esc>", Action::Cancel);

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys::parse_key_notation;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_global_keys_leave_text_alone() {
        let config = default_keybindings();
        for key in config.global.keys() {
            let printable = matches!(key.code, crossterm::event::KeyCode::Char(_));
            let plain = !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
            assert!(!(printable && plain), "global binding {} shadows text", key);
        }
    }

    #[test]
    fn test_every_context_has_bindings() {
        let config = default_keybindings();
        for ctx in KeyContext::all_contexts() {
            assert!(
                config.context.get(ctx).is_some_and(|map| !map.is_empty()),
                "{:?} has no bindings",
                ctx
            );
        }
    }

    #[test]
    fn test_enter_depends_on_context() {
        let config = default_keybindings();
        let enter = parse_key_notation("<CR>").unwrap();
        assert_eq!(
            config.get_action(&enter, KeyContext::Sidebar),
            Some(&Action::Confirm)
        );
        assert_eq!(
            config.get_action(&enter, KeyContext::Terminal),
            Some(&Action::Submit)
        );
        assert_eq!(
            config.get_action(&parse_key_notation("M-3").unwrap(), KeyContext::Editor),
            Some(&Action::SwitchToTab(3))
        );
    }
}
