//! `kb check` command implementation.

use clap::Args;
use kb_index::NavigationIndex;

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Diagnostics`] if the build recorded any diagnostic,
    /// or the build error if the content root is unreadable.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let kb = self.source.knowledge_base()?;
        let index = kb.index()?;

        for diagnostic in index.diagnostics() {
            output.warning(&format!("warning: {diagnostic}"));
        }
        output.info(&summary(&index));

        match index.diagnostics().len() {
            0 => {
                output.success("No problems found");
                Ok(())
            }
            n => Err(CliError::Diagnostics(n)),
        }
    }
}

fn summary(index: &NavigationIndex) -> String {
    let topics = index.topics().count();
    let categories = index.len() - topics;
    format!("{categories} categories, {topics} topics")
}
