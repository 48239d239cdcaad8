//! Command line definition.

use crate::app::Command;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "pd",
    about = concat!("pd v", env!("CARGO_PKG_VERSION"), " - jump to project directories"),
    long_about = "Prints a directory for a shell wrapper to cd into.\n\n\
        With no TARGET, pick one from the ranked history with fzf.\n\
        With a TARGET, resolve it, record the visit, and print it.\n\n\
        Shell wrapper:  pd() { cd \"$(command pd \"$@\")\" || return; }",
    version,
    allow_negative_numbers = true,
    group(ArgGroup::new("action").args(["refresh", "sync", "fzf_preview", "list", "query"]))
)]
pub struct Cli {
    /// Directory or file to jump to (`~`, relative, absolute, `-`, `+N`)
    #[arg(value_name = "TARGET", allow_hyphen_values = true, trailing_var_arg = true)]
    pub target: Vec<String>,

    /// Scan home for projects and merge them into the history
    #[arg(long, alias = "pd-refresh")]
    pub refresh: bool,

    /// Re-rank the history and drop directories that no longer exist
    #[arg(long)]
    pub sync: bool,

    /// Print the preview listing for a selector label
    #[arg(long, value_name = "LABEL", allow_hyphen_values = true)]
    pub fzf_preview: Option<String>,

    /// Print the ranked history
    #[arg(long)]
    pub list: bool,

    /// With --list, print records as JSON
    #[arg(long, requires = "list")]
    pub json: bool,

    /// Jump to the best fuzzy match without opening the selector
    #[arg(short, long, value_name = "PATTERN")]
    pub query: Option<String>,

    /// Configuration file
    #[arg(long, env = crate::CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// History file, overriding the configured one
    #[arg(long, value_name = "PATH")]
    pub history: Option<String>,
}

impl Cli {
    /// The single command this invocation asks for.
    #[must_use]
    pub fn to_command(&self) -> Command {
        if let Some(label) = &self.fzf_preview {
            return Command::Preview(label.clone());
        }
        if self.refresh {
            return Command::Refresh;
        }
        if self.sync {
            return Command::Sync;
        }
        if self.list {
            return Command::List { json: self.json };
        }
        if let Some(pattern) = &self.query {
            return Command::Query(pattern.clone());
        }

        let target = self.target.join(" ");
        let target = target.trim();
        if target.is_empty() {
            Command::Select
        } else {
            Command::Jump(target.to_string())
        }
    }
}
