//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod nav;
pub(crate) mod serve;
pub(crate) mod show;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use kb_config::{CliSettings, Config};
use kb_index::{CacheMode, KnowledgeBase};
use kb_source::FsSource;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use nav::NavArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use show::ShowArgs;

/// Arguments locating the content root, shared by the offline commands.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover kb.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl SourceArgs {
    /// Load configuration with the source directory override applied.
    fn load_config(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            source_dir: self.source_dir.clone(),
            ..CliSettings::default()
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }

    /// Knowledge base over the configured content root, built once.
    fn knowledge_base(&self) -> Result<KnowledgeBase, CliError> {
        let config = self.load_config()?;
        let source = FsSource::new(config.content_resolved.source_dir.clone());
        Ok(KnowledgeBase::new(
            Arc::new(source),
            kb_server::index_options(&config),
            CacheMode::Static,
        ))
    }
}
