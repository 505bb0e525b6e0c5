//! Keybinding configuration types and parsing
//!
//! Key combos are written in vim-style notation (`C-w`, `M-1`, `<CR>`,
//! `<C-Up>`) and resolved per [`KeyContext`], falling back to global bindings.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ui::action::Action;
use crate::ui::events::Focus;

/// A key combination (key code + modifiers)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a KeyCombo from a crossterm KeyEvent.
    ///
    /// Uppercase characters become lowercase + SHIFT so that `G` in config
    /// matches a Shift+g event.
    pub fn from_key_event(event: &crossterm::event::KeyEvent) -> Self {
        match event.code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => Self {
                code: KeyCode::Char(c.to_ascii_lowercase()),
                modifiers: event.modifiers | KeyModifiers::SHIFT,
            },
            _ => Self {
                code: event.code,
                modifiers: event.modifiers,
            },
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("C".into());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("M".into());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("S".into());
        }

        parts.push(match self.code {
            KeyCode::Char(' ') => "<Space>".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "<CR>".to_string(),
            KeyCode::Esc => "<Esc>".to_string(),
            KeyCode::Tab => "<Tab>".to_string(),
            KeyCode::BackTab => "<S-Tab>".to_string(),
            KeyCode::Backspace => "<BS>".to_string(),
            KeyCode::Delete => "<Del>".to_string(),
            KeyCode::Up => "<Up>".to_string(),
            KeyCode::Down => "<Down>".to_string(),
            KeyCode::Left => "<Left>".to_string(),
            KeyCode::Right => "<Right>".to_string(),
            KeyCode::PageUp => "<PageUp>".to_string(),
            KeyCode::PageDown => "<PageDown>".to_string(),
            KeyCode::Home => "<Home>".to_string(),
            KeyCode::End => "<End>".to_string(),
            KeyCode::F(n) => format!("<F{}>", n),
            other => format!("{:?}", other),
        });

        write!(f, "{}", parts.join("-"))
    }
}

/// Context for keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyContext {
    /// Keys that work everywhere unless overridden
    Global,
    /// Explorer and the other sidebar panels
    Sidebar,
    /// The page in the editor area
    Editor,
    /// Terminal pane input
    Terminal,
    /// Menu bar with a menu open
    Menu,
    /// Status-line text prompt
    Prompt,
}

impl KeyContext {
    /// Get all non-global contexts
    pub fn all_contexts() -> &'static [KeyContext] {
        &[
            KeyContext::Sidebar,
            KeyContext::Editor,
            KeyContext::Terminal,
            KeyContext::Menu,
            KeyContext::Prompt,
        ]
    }

    /// Section name in the `[keys]` config table
    pub fn config_name(self) -> &'static str {
        match self {
            KeyContext::Global => "global",
            KeyContext::Sidebar => "sidebar",
            KeyContext::Editor => "editor",
            KeyContext::Terminal => "terminal",
            KeyContext::Menu => "menu",
            KeyContext::Prompt => "prompt",
        }
    }

    /// Resolve the context for the current focus. An open menu or prompt
    /// overlays the focused pane.
    pub fn resolve(focus: Focus, menu_open: bool, prompt_active: bool) -> Self {
        if prompt_active {
            return KeyContext::Prompt;
        }
        if menu_open {
            return KeyContext::Menu;
        }
        match focus {
            Focus::Sidebar => KeyContext::Sidebar,
            Focus::Editor => KeyContext::Editor,
            Focus::Terminal => KeyContext::Terminal,
        }
    }

    /// Whether unbound printable keys are typed as text
    pub fn accepts_text(self) -> bool {
        matches!(self, KeyContext::Terminal | KeyContext::Prompt)
    }
}

/// Configuration for all keybindings
#[derive(Debug, Clone, Default)]
pub struct KeybindingConfig {
    /// Global keybindings (apply to all contexts unless overridden)
    pub global: HashMap<KeyCombo, Action>,
    /// Context-specific keybindings
    pub context: HashMap<KeyContext, HashMap<KeyCombo, Action>>,
}

impl KeybindingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an action for a key combo in a given context.
    /// Context-specific bindings win over global ones.
    pub fn get_action(&self, key: &KeyCombo, context: KeyContext) -> Option<&Action> {
        if let Some(action) = self
            .context
            .get(&context)
            .and_then(|bindings| bindings.get(key))
        {
            return Some(action);
        }
        self.global.get(key)
    }

    /// First key bound to `action` in `context` (or globally), for hints
    pub fn key_for(&self, action: &Action, context: KeyContext) -> Option<&KeyCombo> {
        self.context
            .get(&context)
            .and_then(|bindings| first_key(bindings, action))
            .or_else(|| first_key(&self.global, action))
    }

    /// Merge user configuration on top of defaults
    pub fn merge(&mut self, other: KeybindingConfig) {
        self.global.extend(other.global);
        for (ctx, bindings) in other.context {
            self.context.entry(ctx).or_default().extend(bindings);
        }
    }
}

/// Error type for key parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty key notation")]
    Empty,
    #[error("no key specified")]
    NoKey,
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),
    #[error("invalid special key: {0}")]
    InvalidSpecialKey(String),
}

/// Parse a vim-style key notation string into a KeyCombo
///
/// Supported notation:
/// - `C-x` for Ctrl+x, `M-x` for Alt+x, `S-x` for Shift+x, combinable
/// - `<CR>`, `<Esc>`, `<Tab>`, `<BS>`, `<Del>`, `<Space>`
/// - `<Up>`, `<Down>`, `<Left>`, `<Right>`, `<PageUp>`, `<PageDown>`,
///   `<Home>`, `<End>`
/// - `<F1>` through `<F12>`
/// - modifiers inside brackets, e.g. `<C-Up>`
pub fn parse_key_notation(s: &str) -> Result<KeyCombo, KeyParseError> {
    let s = s.trim();

    if s.is_empty() {
        return Err(KeyParseError::Empty);
    }

    if s.starts_with('<') && s.ends_with('>') && s.len() > 2 {
        return parse_special_key(s);
    }

    // A lone "-" is the key itself
    if s == "-" {
        return Ok(KeyCombo::new(KeyCode::Char('-'), KeyModifiers::NONE));
    }

    let parts: Vec<&str> = s.split('-').collect();
    let last = parts.len() - 1;

    let mut modifiers = KeyModifiers::NONE;
    for part in &parts[..last] {
        modifiers |= parse_modifier(part)?;
    }

    let key_str = parts[last];
    if key_str.is_empty() {
        return Err(KeyParseError::NoKey);
    }

    let (code, needs_shift) = parse_key_code(key_str)?;
    if needs_shift {
        modifiers |= KeyModifiers::SHIFT;
    }

    Ok(KeyCombo::new(code, modifiers))
}

fn parse_modifier(part: &str) -> Result<KeyModifiers, KeyParseError> {
    match part {
        "C" => Ok(KeyModifiers::CONTROL),
        "M" | "A" => Ok(KeyModifiers::ALT),
        "S" => Ok(KeyModifiers::SHIFT),
        other => Err(KeyParseError::InvalidModifier(other.to_string())),
    }
}

/// Parse a bracketed key such as `<CR>` or `<C-Up>`
fn parse_special_key(s: &str) -> Result<KeyCombo, KeyParseError> {
    let inner = &s[1..s.len() - 1];
    let parts: Vec<&str> = inner.split('-').collect();
    let last = parts.len() - 1;

    let mut modifiers = KeyModifiers::NONE;
    for part in &parts[..last] {
        modifiers |= parse_modifier(part)?;
    }

    let key_name = parts[last];
    let code = match key_name.to_uppercase().as_str() {
        "CR" | "ENTER" | "RETURN" => KeyCode::Enter,
        "ESC" | "ESCAPE" => KeyCode::Esc,
        "TAB" => KeyCode::Tab,
        "BS" | "BACKSPACE" => KeyCode::Backspace,
        "DEL" | "DELETE" => KeyCode::Delete,
        "UP" => KeyCode::Up,
        "DOWN" => KeyCode::Down,
        "LEFT" => KeyCode::Left,
        "RIGHT" => KeyCode::Right,
        "PAGEUP" | "PGUP" => KeyCode::PageUp,
        "PAGEDOWN" | "PGDN" => KeyCode::PageDown,
        "HOME" => KeyCode::Home,
        "END" => KeyCode::End,
        "SPACE" => KeyCode::Char(' '),
        name if name.starts_with('F') && name.len() > 1 => {
            let num: u8 = name[1..]
                .parse()
                .map_err(|_| KeyParseError::InvalidKey(name.to_string()))?;
            if num == 0 || num > 12 {
                return Err(KeyParseError::InvalidKey(name.to_string()));
            }
            KeyCode::F(num)
        }
        _ => return Err(KeyParseError::InvalidSpecialKey(key_name.to_string())),
    };

    Ok(KeyCombo::new(code, modifiers))
}

/// Parse a bare key. Returns the code and whether SHIFT should be added.
fn parse_key_code(s: &str) -> Result<(KeyCode, bool), KeyParseError> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok((KeyCode::Char(c.to_ascii_lowercase()), c.is_ascii_uppercase()));
    }

    if s.starts_with('<') && s.ends_with('>') && s.len() > 2 {
        return parse_special_key(s).map(|combo| (combo.code, false));
    }

    match s.to_uppercase().as_str() {
        "SPACE" => Ok((KeyCode::Char(' '), false)),
        "TAB" => Ok((KeyCode::Tab, false)),
        "ENTER" | "CR" | "RETURN" => Ok((KeyCode::Enter, false)),
        "ESC" | "ESCAPE" => Ok((KeyCode::Esc, false)),
        "BS" | "BACKSPACE" => Ok((KeyCode::Backspace, false)),
        _ => Err(KeyParseError::InvalidKey(s.to_string())),
    }
}

impl FromStr for KeyCombo {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_notation(s)
    }
}

/// Lowest-sorting key bound to `action`, so hints are stable
fn first_key<'a>(map: &'a HashMap<KeyCombo, Action>, action: &Action) -> Option<&'a KeyCombo> {
    map.iter()
        .filter(|(_, bound)| *bound == action)
        .map(|(key, _)| key)
        .min_by_key(|key| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};

    fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_parse_modified_keys() {
        let key = parse_key_notation("C-w").unwrap();
        assert_eq!(key.code, KeyCode::Char('w'));
        assert_eq!(key.modifiers, KeyModifiers::CONTROL);

        let key = parse_key_notation("M-1").unwrap();
        assert_eq!(key.code, KeyCode::Char('1'));
        assert_eq!(key.modifiers, KeyModifiers::ALT);

        let key = parse_key_notation("C-S-t").unwrap();
        assert_eq!(key.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_key_notation("<CR>").unwrap().code, KeyCode::Enter);
        assert_eq!(parse_key_notation("<Esc>").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key_notation("<BS>").unwrap().code, KeyCode::Backspace);
        assert_eq!(parse_key_notation("<Space>").unwrap().code, KeyCode::Char(' '));
        assert_eq!(parse_key_notation("<F10>").unwrap().code, KeyCode::F(10));

        let key = parse_key_notation("<C-Up>").unwrap();
        assert_eq!(key.code, KeyCode::Up);
        assert_eq!(key.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_key_notation("  "), Err(KeyParseError::Empty));
        assert_eq!(parse_key_notation("C-"), Err(KeyParseError::NoKey));
        assert_eq!(
            parse_key_notation("X-a"),
            Err(KeyParseError::InvalidModifier("X".into()))
        );
        assert_eq!(
            parse_key_notation("<Nope>"),
            Err(KeyParseError::InvalidSpecialKey("Nope".into()))
        );
        assert!(matches!(
            parse_key_notation("<F13>"),
            Err(KeyParseError::InvalidKey(_))
        ));
        assert!(matches!(
            parse_key_notation("abc"),
            Err(KeyParseError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_uppercase_means_shift() {
        let upper = parse_key_notation("R").unwrap();
        assert_eq!(upper.code, KeyCode::Char('r'));
        assert_eq!(upper.modifiers, KeyModifiers::SHIFT);
        assert_ne!(upper, parse_key_notation("r").unwrap());

        let event = key_event(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(KeyCombo::from_key_event(&event), upper);
    }

    #[test]
    fn test_display_round_trips() {
        for notation in ["C-w", "M-1", "<CR>", "<F10>", "C-<Up>", "<Space>"] {
            let combo = parse_key_notation(notation).unwrap();
            let shown = combo.to_string();
            assert_eq!(parse_key_notation(&shown).unwrap(), combo, "{notation}");
        }
    }

    #[test]
    fn test_context_resolution() {
        assert_eq!(
            KeyContext::resolve(Focus::Sidebar, false, false),
            KeyContext::Sidebar
        );
        assert_eq!(
            KeyContext::resolve(Focus::Terminal, true, false),
            KeyContext::Menu
        );
        assert_eq!(
            KeyContext::resolve(Focus::Editor, true, true),
            KeyContext::Prompt
        );
        assert!(KeyContext::Terminal.accepts_text());
        assert!(!KeyContext::Sidebar.accepts_text());
    }

    #[test]
    fn test_context_binding_overrides_global() {
        let mut config = KeybindingConfig::new();
        let enter = parse_key_notation("<CR>").unwrap();
        config.global.insert(enter.clone(), Action::Confirm);
        config
            .context
            .entry(KeyContext::Terminal)
            .or_default()
            .insert(enter.clone(), Action::Submit);

        assert_eq!(
            config.get_action(&enter, KeyContext::Terminal),
            Some(&Action::Submit)
        );
        assert_eq!(
            config.get_action(&enter, KeyContext::Sidebar),
            Some(&Action::Confirm)
        );
        assert_eq!(config.key_for(&Action::Submit, KeyContext::Terminal), Some(&enter));
    }

    #[test]
    fn test_key_for_falls_back_to_global() {
        let mut config = KeybindingConfig::new();
        let quit = parse_key_notation("C-q").unwrap();
        config.global.insert(quit.clone(), Action::Quit);

        assert_eq!(config.key_for(&Action::Quit, KeyContext::Terminal), Some(&quit));
        assert_eq!(config.key_for(&Action::Submit, KeyContext::Terminal), None);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = KeybindingConfig::new();
        base.global
            .insert(parse_key_notation("C-q").unwrap(), Action::Quit);

        let mut user = KeybindingConfig::new();
        user.global
            .insert(parse_key_notation("C-q").unwrap(), Action::ToggleTerminal);
        base.merge(user);

        assert_eq!(
            base.get_action(&parse_key_notation("C-q").unwrap(), KeyContext::Editor),
            Some(&Action::ToggleTerminal)
        );
    }
}
