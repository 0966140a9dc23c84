//! `kb nav` command implementation.

use clap::Args;
use kb_index::{NavigationNode, NodeKind, Variant};

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the content root is unreadable.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let kb = self.source.knowledge_base()?;
        let root = kb.navigation()?;

        if self.json {
            output.result(&serde_json::to_string_pretty(&*root)?);
            return Ok(());
        }

        output.highlight(&root.title);
        for line in outline_lines(&root) {
            output.result(&line);
        }

        Ok(())
    }
}

/// Indented outline of the tree below `root`, one line per node.
fn outline_lines(root: &NavigationNode) -> Vec<String> {
    let mut lines = Vec::new();
    for child in &root.children {
        push_lines(child, 0, &mut lines);
    }
    lines
}

fn push_lines(node: &NavigationNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let route = node.path.join("/");
    match node.kind {
        NodeKind::Category => lines.push(format!("{indent}{}/  ({route})", node.title)),
        NodeKind::Topic => {
            let variants: Vec<&str> = node.variants.keys().map(|v| variant_tag(*v)).collect();
            lines.push(format!(
                "{indent}{}  ({route}) [{}]",
                node.title,
                variants.join(", ")
            ));
        }
    }
    for child in &node.children {
        push_lines(child, depth + 1, lines);
    }
}

/// Short label of a variant for listings.
pub(crate) fn variant_tag(variant: Variant) -> &'static str {
    match variant {
        Variant::QuestionsOnly => "q",
        Variant::QuestionsAndAnswers => "qa",
    }
}
