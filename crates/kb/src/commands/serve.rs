//! `kb serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use kb_config::{CliSettings, Config, IndexMode};
use kb_server::{run_server, server_config_from_kb_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover kb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Rebuild the index when content changes.
    #[arg(long)]
    watch: bool,

    /// Build the index once, even if the config enables watching.
    #[arg(long, conflicts_with = "watch")]
    no_watch: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let watch = self.resolve_watch();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            watch,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Source directory: {}",
            config.content_resolved.source_dir.display()
        ));
        match config.index.mode {
            IndexMode::Watch => output.info("Index mode: watch"),
            IndexMode::Static => output.info("Index mode: static"),
        }

        let server_config = server_config_from_kb_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve the watch override from --watch/--no-watch flags.
    fn resolve_watch(&self) -> Option<bool> {
        if self.no_watch {
            Some(false)
        } else {
            self.watch.then_some(true)
        }
    }
}
