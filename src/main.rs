use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use editor_shell::data::{FILE_TREE_STORAGE_KEY, TABS_STORAGE_KEY};
use editor_shell::ui::terminal_guard::install_panic_hook;
use editor_shell::web::server::{run_server, serve};
use editor_shell::{util, App, AppStateStore, Config, Database, StateStorage, WebAppState};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "editor-shell", version, about)]
struct Cli {
    /// Data directory (default: ~/.editor-shell)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the terminal shell (default)
    Shell {
        /// Do not start the bundled API server
        #[arg(long)]
        no_server: bool,
    },
    /// Run the API server in the foreground
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print persisted shell state as JSON
    State,
    /// Clear persisted shell state
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir);

    match cli.command.unwrap_or(Command::Shell { no_server: false }) {
        Command::Shell { no_server } => run_shell(no_server).await,
        Command::Serve { host, port } => run_serve(host, port).await,
        Command::State => print_state(),
        Command::Reset => reset_state(),
    }
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
}

/// Log to ~/.editor-shell/logs/editor-shell.log; the terminal belongs to the UI
fn init_file_logging() -> Result<()> {
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn open_storage() -> Result<AppStateStore> {
    let db = Database::open_default()?;
    Ok(AppStateStore::new(db.connection()))
}

async fn run_shell(no_server: bool) -> Result<()> {
    init_file_logging()?;
    install_panic_hook();

    let config = Config::load();
    let storage: Arc<dyn StateStorage> = Arc::new(open_storage()?);

    let shutdown = CancellationToken::new();
    let server = if no_server {
        None
    } else {
        spawn_bundled_server(&config, shutdown.clone()).await
    };

    let mut app = App::new(config, storage);
    let result = app.run().await;

    shutdown.cancel();
    if let Some(server) = server {
        if let Err(err) = server.await {
            tracing::warn!(error = %err, "Bundled server task failed");
        }
    }
    result
}

/// Serve the API in the background for the shell's pollers.
///
/// When the address is taken the shell talks to whatever is listening there.
async fn spawn_bundled_server(config: &Config, shutdown: CancellationToken) -> Option<JoinHandle<()>> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::warn!(%addr, error = %err, "Could not bind bundled server, using existing one");
            return None;
        }
    };

    let state = WebAppState::seeded(config.proxy_timeout);
    let cors = config.server.cors_permissive;
    tracing::info!(%addr, "Bundled server listening");
    Some(tokio::spawn(async move {
        if let Err(err) = serve(listener, state, cors, async move { shutdown.cancelled().await }).await {
            tracing::error!(error = %err, "Bundled server stopped");
        }
    }))
}

async fn run_serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    init_stderr_logging();

    let config = Config::load();
    let mut server = config.server.clone();
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    run_server(WebAppState::seeded(config.proxy_timeout), server).await
}

fn print_state() -> Result<()> {
    init_stderr_logging();
    let storage = open_storage()?;

    let mut state = serde_json::Map::new();
    for key in [TABS_STORAGE_KEY, FILE_TREE_STORAGE_KEY] {
        let value = storage.get(key)?.unwrap_or(serde_json::Value::Null);
        state.insert(key.to_string(), value);
    }
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn reset_state() -> Result<()> {
    init_stderr_logging();
    let storage = open_storage()?;
    for key in [TABS_STORAGE_KEY, FILE_TREE_STORAGE_KEY] {
        storage.remove(key)?;
    }
    println!("Shell state cleared");
    Ok(())
}
