pub mod action;
pub mod api_client;
pub mod app;
pub mod components;
pub mod events;
pub mod file_tree;
pub mod layout;
pub mod menu;
pub mod pages;
pub mod poller;
pub mod shell;
pub mod tab_manager;
pub mod terminal_guard;
pub mod terminal_pane;

pub use action::Action;
pub use app::App;
pub use events::{AppEvent, Focus};
pub use shell::{Shell, ShellOptions};
pub use tab_manager::TabManager;
