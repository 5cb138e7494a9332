//! Dorksmith: an advanced web-search query builder
//!
//! This is the main entry point for the application.

use anyhow::{bail, Context, Result};
use dorksmith::{
    ai::{AiAssistant, HttpCompletionProvider},
    config::{self, Settings},
    network::HttpClient,
    session::Session,
    storage::{JsonFileStore, MemoryStore, Store},
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let Some(config_path) = parse_args()? else {
        return Ok(());
    };

    // Load configuration
    let settings = config::load(config_path.as_deref())?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting Dorksmith v{}", dorksmith::VERSION);
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Open the durable store and restore the session
    let store = open_store(&settings)?;
    let session = Session::load(store, &settings);

    // Initialize HTTP client and AI assistant
    let client = HttpClient::with_settings(&settings.outgoing)?;
    let provider = Arc::new(HttpCompletionProvider::new(client, &settings.ai));
    let assistant = AiAssistant::new(provider, &settings.ai);
    info!("AI assistant ready (timeout {:?})", assistant.timeout());

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    // Create application state and router
    let state = AppState::new(settings, session, assistant);
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse command line arguments. Returns `None` when the process should exit.
fn parse_args() -> Result<Option<Option<PathBuf>>> {
    let mut config_path = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().context("--config requires a file path")?;
                config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("dorksmith {}", dorksmith::VERSION);
                return Ok(None);
            }
            other => bail!("unknown argument: {}", other),
        }
    }

    Ok(Some(config_path))
}

fn open_store(settings: &Settings) -> Result<Box<dyn Store>> {
    if settings.storage.in_memory {
        info!("Using in-memory store; nothing will be kept after exit");
        return Ok(Box::new(MemoryStore::new()));
    }

    let path = settings
        .storage
        .path
        .clone()
        .unwrap_or_else(JsonFileStore::default_path);
    let store = JsonFileStore::open(&path)
        .with_context(|| format!("failed to open store at {}", path.display()))?;
    Ok(Box::new(store))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Dorksmith v{}
Build advanced search-engine queries from structured filters

USAGE:
    dorksmith [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    DORKSMITH_SETTINGS_PATH  Path to settings.yml
    DORKSMITH_DEBUG          Enable debug logging (true/false)
    DORKSMITH_PORT           Server port
    DORKSMITH_BIND_ADDRESS   Bind address
    DORKSMITH_STORAGE_PATH   Path to the store file
    RUST_LOG                 Log filter (overrides DORKSMITH_DEBUG)
"#,
        dorksmith::VERSION
    );
}
