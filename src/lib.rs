pub mod client;
pub mod config;
pub mod data;
pub mod ui;
pub mod util;
pub mod web;

pub use client::{ApiClient, ClientError};
pub use config::Config;
pub use data::{AppStateStore, Database, MemoryStorage, StateStorage};
pub use ui::{App, Shell, ShellOptions, TabManager};
pub use web::{ServerConfig, WebAppState};
