//! HTTP API for the knowledge-base index.
//!
//! A thin axum layer over [`KnowledgeBase`]:
//! - `GET /api/navigation`: full navigation tree and its generation
//! - `GET /api/content/{*path}?variant=...`: resolved topic content
//! - `GET /api/health`: liveness plus current generation
//!
//! In watch mode a background thread drains content change events and
//! invalidates the index; the next request rebuilds it.
//!
//! # Quick Start
//!
//! ```ignore
//! use kb_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: "content".into(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod state;
mod watch;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use kb_config::{Config, IndexMode};
use kb_index::{CacheMode, IndexOptions, KnowledgeBase};
use kb_source::{ContentSource, FsSource};
use state::AppState;
use watch::ContentWatcher;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content root directory.
    pub source_dir: PathBuf,
    /// Indexing options.
    pub options: IndexOptions,
    /// Rebuild policy.
    pub mode: CacheMode,
    /// Glob patterns limiting which changes invalidate the index.
    pub watch_patterns: Option<Vec<String>>,
    /// Application version (for `ETag` computation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("content"),
            options: IndexOptions::default(),
            mode: CacheMode::Static,
            watch_patterns: None,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid, the watcher cannot start,
/// or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = FsSource::new(config.source_dir.clone());
    if let Some(patterns) = &config.watch_patterns {
        source = source.with_watch_patterns(patterns);
    }
    let source: Arc<dyn ContentSource> = Arc::new(source);
    let kb = Arc::new(KnowledgeBase::new(source, config.options.clone(), config.mode));

    // Warm the index so the first request does not pay for the build.
    if let Err(e) = kb.index() {
        tracing::warn!(error = %e, "Initial index build failed, retrying on first request");
    }

    let _watcher = match config.mode {
        CacheMode::Watch => Some(ContentWatcher::start(Arc::clone(&kb))?),
        CacheMode::Static => None,
    };

    let state = Arc::new(AppState {
        kb,
        version: config.version.clone(),
    });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, mode = ?config.mode, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the loaded `kb.toml`.
#[must_use]
pub fn server_config_from_kb_config(config: &Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.content_resolved.source_dir.clone(),
        options: index_options(config),
        mode: cache_mode(config.index.mode),
        watch_patterns: config.index.watch_patterns.clone(),
        version,
    }
}

/// Indexing options from the loaded configuration.
#[must_use]
pub fn index_options(config: &Config) -> IndexOptions {
    IndexOptions {
        extensions: config.content_resolved.extensions.clone(),
        max_depth: config.content_resolved.max_depth,
        root_title: config.index.root_title.clone(),
    }
}

/// Cache mode for a configured index mode.
#[must_use]
pub fn cache_mode(mode: IndexMode) -> CacheMode {
    match mode {
        IndexMode::Static => CacheMode::Static,
        IndexMode::Watch => CacheMode::Watch,
    }
}
