use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ui::action::Action;
use crate::ui::layout::{MAX_TERMINAL_HEIGHT, MIN_TERMINAL_HEIGHT};
use crate::ui::shell::ShellOptions;
use crate::util::paths::config_path;
use crate::web::state::DEFAULT_PROXY_TIMEOUT;
use crate::web::ServerConfig;

use super::default_keys::default_keybindings;
use super::keys::{parse_key_notation, KeyCombo, KeyContext, KeybindingConfig};

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

const MIN_SIDEBAR_WIDTH: u16 = 16;
const MAX_SIDEBAR_WIDTH: u16 = 80;

/// Extra time the shell's client waits beyond the proxy's own timeout
const CLIENT_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind options
    pub server: ServerConfig,
    /// Base url the shell uses to reach the API server
    pub api_url: String,
    /// Outbound timeout for the send proxy
    pub proxy_timeout: Duration,
    /// Shell startup options
    pub shell: ShellOptions,
    /// Sidebar width in columns, activity bar included
    pub sidebar_width: u16,
    /// Keybinding configuration
    pub keybindings: KeybindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        let server = ServerConfig::default();
        let api_url = format!("http://{}:{}", server.host, server.port);
        Self {
            server,
            api_url,
            proxy_timeout: DEFAULT_PROXY_TIMEOUT,
            shell: ShellOptions::default(),
            sidebar_width: 30,
            keybindings: default_keybindings(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_permissive: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlClientConfig {
    /// Defaults to the `[server]` address
    pub api_url: Option<String>,
    pub proxy_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlShellConfig {
    pub restore_tabs: Option<bool>,
    pub terminal_open: Option<bool>,
    pub terminal_height: Option<u16>,
    pub sidebar_width: Option<u16>,
}

/// TOML representation of keybinding configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlKeybindings {
    /// Global keybindings; context tables are picked out by name
    #[serde(flatten)]
    pub global: HashMap<String, toml::Value>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub server: Option<TomlServerConfig>,
    pub client: Option<TomlClientConfig>,
    pub shell: Option<TomlShellConfig>,
    pub keys: Option<TomlKeybindings>,
}

impl TomlKeybindings {
    /// Convert TOML keybindings to KeybindingConfig.
    ///
    /// Entries are `action = "key"`; tables named after a context hold that
    /// context's bindings. Unknown actions and bad notation are skipped.
    fn to_keybinding_config(&self) -> KeybindingConfig {
        let mut config = KeybindingConfig::new();

        for (name, value) in &self.global {
            match value {
                toml::Value::String(key) => {
                    if let Some((combo, action)) = parse_binding(name, key) {
                        config.global.insert(combo, action);
                    }
                }
                toml::Value::Table(table) => {
                    let Some(context) = KeyContext::all_contexts()
                        .iter()
                        .copied()
                        .find(|ctx| ctx.config_name() == name)
                    else {
                        tracing::warn!(section = %name, "Unknown keybinding context");
                        continue;
                    };
                    let bindings = config.context.entry(context).or_default();
                    for (action_name, key) in table {
                        if let Some(key) = key.as_str() {
                            if let Some((combo, action)) = parse_binding(action_name, key) {
                                bindings.insert(combo, action);
                            }
                        }
                    }
                }
                other => {
                    tracing::warn!(action = %name, value = %other, "Ignoring keybinding value");
                }
            }
        }

        config
    }
}

fn parse_binding(action_name: &str, key: &str) -> Option<(KeyCombo, Action)> {
    let Some(action) = parse_action(action_name) else {
        tracing::warn!(action = %action_name, "Unknown action in keybindings");
        return None;
    };
    match parse_key_notation(key) {
        Ok(combo) => Some((combo, action)),
        Err(err) => {
            tracing::warn!(action = %action_name, key = %key, error = %err, "Invalid key notation");
            None
        }
    }
}

/// Parse an action name string into an Action
pub fn parse_action(name: &str) -> Option<Action> {
    if let Some(n) = name.strip_prefix("switch_to_tab_") {
        return n.parse().ok().filter(|n| (1..=9).contains(n)).map(Action::SwitchToTab);
    }
    if let Some(n) = name.strip_prefix("show_panel_") {
        return n.parse().ok().filter(|n| (1..=5).contains(n)).map(Action::ShowPanel);
    }

    match name {
        // Global
        "quit" => Some(Action::Quit),
        "toggle_sidebar" => Some(Action::ToggleSidebar),
        "toggle_terminal" => Some(Action::ToggleTerminal),
        "grow_terminal" => Some(Action::GrowTerminal),
        "shrink_terminal" => Some(Action::ShrinkTerminal),
        "open_menu" => Some(Action::OpenMenu),
        "focus_next" => Some(Action::FocusNext),
        "new_file" => Some(Action::NewFile),

        // Tab management
        "close_tab" => Some(Action::CloseTab),
        "next_tab" => Some(Action::NextTab),
        "prev_tab" => Some(Action::PrevTab),

        // Navigation
        "select_next" => Some(Action::SelectNext),
        "select_prev" => Some(Action::SelectPrev),
        "confirm" => Some(Action::Confirm),
        "cancel" => Some(Action::Cancel),

        // Explorer
        "add_file" => Some(Action::AddFile),
        "add_folder" => Some(Action::AddFolder),
        "delete_node" => Some(Action::DeleteNode),
        "reset_tree" => Some(Action::ResetTree),

        // Menu
        "menu_next" => Some(Action::MenuNext),
        "menu_prev" => Some(Action::MenuPrev),

        // Input
        "backspace" => Some(Action::Backspace),
        "submit" => Some(Action::Submit),

        // Pages
        "refresh" => Some(Action::Refresh),
        "cycle_method" => Some(Action::CycleMethod),
        "edit_url" => Some(Action::EditUrl),
        "edit_body" => Some(Action::EditBody),
        "send_request" => Some(Action::SendRequest),
        "save_request" => Some(Action::SaveRequest),
        "delete_request" => Some(Action::DeleteRequest),

        _ => None,
    }
}

impl Config {
    /// Timeout for the shell's API client; always outlasts `proxy_timeout`
    /// so a hung upstream comes back as a failed send
    pub fn client_timeout(&self) -> Duration {
        self.proxy_timeout + CLIENT_TIMEOUT_MARGIN
    }

    /// Load configuration from the data directory, merging with defaults.
    ///
    /// The bundled example is written on first run. A file that fails to
    /// parse is logged and ignored.
    pub fn load() -> Self {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        match fs::read_to_string(&config_file) {
            Ok(contents) => Self::from_toml_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %config_file.display(),
                    error = %err,
                    "Failed to parse config, using defaults"
                );
                Config::default()
            }),
            Err(err) => {
                tracing::debug!(path = %config_file.display(), error = %err, "No config file");
                Config::default()
            }
        }
    }

    /// Parse a config file body and merge it over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        Ok(Self::default().merged(toml_config))
    }

    fn merged(mut self, toml_config: TomlConfig) -> Self {
        if let Some(server) = toml_config.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(cors) = server.cors_permissive {
                self.server.cors_permissive = cors;
            }
        }

        self.api_url = format!("http://{}:{}", self.server.host, self.server.port);
        if let Some(client) = toml_config.client {
            if let Some(api_url) = client.api_url {
                self.api_url = api_url.trim_end_matches('/').to_string();
            }
            if let Some(secs) = client.proxy_timeout_secs {
                self.proxy_timeout = Duration::from_secs(secs.max(1));
            }
        }

        if let Some(shell) = toml_config.shell {
            if let Some(restore) = shell.restore_tabs {
                self.shell.restore_tabs = restore;
            }
            if let Some(open) = shell.terminal_open {
                self.shell.terminal_open = open;
            }
            if let Some(height) = shell.terminal_height {
                self.shell.terminal_height = height.clamp(MIN_TERMINAL_HEIGHT, MAX_TERMINAL_HEIGHT);
            }
            if let Some(width) = shell.sidebar_width {
                self.sidebar_width = width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);
            }
        }

        if let Some(keys) = toml_config.keys {
            self.keybindings.merge(keys.to_keybinding_config());
        }

        self
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!(error = %err, "Failed to create config directory");
                return;
            }
        }

        if let Err(err) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %err, "Failed to write default config");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::layout::DEFAULT_TERMINAL_HEIGHT;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://127.0.0.1:3000");
        assert_eq!(config.proxy_timeout, Duration::from_secs(15));
        assert!(config.shell.restore_tabs);
        assert_eq!(config.shell.terminal_height, DEFAULT_TERMINAL_HEIGHT);
    }

    #[test]
    fn test_client_outlasts_proxy() {
        let mut config = Config::default();
        assert_eq!(config.client_timeout(), Duration::from_secs(20));

        config.proxy_timeout = Duration::from_secs(1);
        assert!(config.client_timeout() > config.proxy_timeout);
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::from_toml_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.api_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 4100

            [client]
            proxy_timeout_secs = 3

            [shell]
            restore_tabs = false
            terminal_open = true
            terminal_height = 99
            sidebar_width = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.api_url, "http://127.0.0.1:4100");
        assert_eq!(config.proxy_timeout, Duration::from_secs(3));
        assert!(!config.shell.restore_tabs);
        assert!(config.shell.terminal_open);
        assert_eq!(config.shell.terminal_height, MAX_TERMINAL_HEIGHT);
        assert_eq!(config.sidebar_width, MIN_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_explicit_api_url_wins() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 4100

            [client]
            api_url = "http://remote.test:9000/"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://remote.test:9000");
    }

    #[test]
    fn test_keybindings_merge() {
        let config = Config::from_toml_str(
            r#"
            [keys]
            quit = "C-x"
            not_an_action = "C-y"

            [keys.terminal]
            cancel = "C-g"
            "#,
        )
        .unwrap();

        let bindings = &config.keybindings;
        assert_eq!(
            bindings.get_action(&parse_key_notation("C-x").unwrap(), KeyContext::Editor),
            Some(&Action::Quit)
        );
        assert_eq!(
            bindings.get_action(&parse_key_notation("C-q").unwrap(), KeyContext::Editor),
            Some(&Action::Quit)
        );
        assert_eq!(
            bindings.get_action(&parse_key_notation("C-g").unwrap(), KeyContext::Terminal),
            Some(&Action::Cancel)
        );
        assert!(bindings
            .get_action(&parse_key_notation("C-y").unwrap(), KeyContext::Editor)
            .is_none());
    }

    #[test]
    fn test_parse_action_numbered() {
        assert_eq!(parse_action("switch_to_tab_4"), Some(Action::SwitchToTab(4)));
        assert_eq!(parse_action("switch_to_tab_0"), None);
        assert_eq!(parse_action("show_panel_2"), Some(Action::ShowPanel(2)));
        assert_eq!(parse_action("show_panel_9"), None);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::from_toml_str("[server\nport = 1").is_err());
    }
}
