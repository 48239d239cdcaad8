//! Directory listings for the selector's preview pane.
//!
//! Tools are tried in order and the first one that succeeds with some output
//! wins. When none does, a fixed message is printed instead, so the preview
//! pane is never blank.

use super::paths;
use std::path::Path;
use std::process::{Command, Stdio};

/// Shown when the previewed path is gone.
pub const MISSING_MESSAGE: &str = "Directory does not exist.";

/// Shown when the directory has no entries.
pub const EMPTY_MESSAGE: &str = "Empty.";

/// Shown when every tool failed on a non-empty directory.
pub const UNLISTABLE_MESSAGE: &str = "Could not list contents.";

/// An external command that lists a directory given as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTool {
    pub program: String,
    pub args: Vec<String>,
}

impl ListingTool {
    /// Creates a tool invocation; the directory is appended after `args`.
    #[must_use]
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    /// The default chain: `exa`, then `tree`, then `ls`.
    #[must_use]
    pub fn default_chain() -> Vec<Self> {
        vec![
            Self::new(
                "exa",
                &[
                    "--all",
                    "--color=always",
                    "--git",
                    "--group-directories-first",
                    "--header",
                    "--long",
                ],
            ),
            Self::new("tree", &["-C", "-L", "1"]),
            Self::new(
                "ls",
                &[
                    "--almost-all",
                    "--color=always",
                    "--group-directories-first",
                    "--human-readable",
                    "-l",
                ],
            ),
        ]
    }

    /// Runs the tool on `dir`, returning its stdout on success.
    fn run(&self, dir: &Path) -> Option<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(dir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) if out.status.success() => Some(String::from_utf8_lossy(&out.stdout).into_owned()),
            Ok(out) => {
                tracing::debug!(tool = %self.program, status = ?out.status, "listing tool failed");
                None
            }
            Err(e) => {
                tracing::debug!(tool = %self.program, error = %e, "listing tool unavailable");
                None
            }
        }
    }
}

/// Produces the preview text for `dir` using the first tool in `tools` that works.
#[must_use]
pub fn preview(dir: &Path, tools: &[ListingTool]) -> String {
    let _span = tracing::debug_span!("preview_listing", dir = %dir.display()).entered();

    if !paths::exists(dir) {
        return MISSING_MESSAGE.to_string();
    }

    if let Some(listing) = tools
        .iter()
        .filter_map(|tool| tool.run(dir))
        .find(|listing| !listing.trim().is_empty())
    {
        return listing;
    }

    let is_empty = std::fs::read_dir(dir).map_or(false, |mut entries| entries.next().is_none());
    if is_empty {
        EMPTY_MESSAGE.to_string()
    } else {
        UNLISTABLE_MESSAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn broken_chain() -> Vec<ListingTool> {
        vec![ListingTool::new("pd-test-no-such-lister", &[])]
    }

    #[test]
    fn missing_directory_message() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(preview(&tmp.path().join("gone"), &broken_chain()), MISSING_MESSAGE);
    }

    #[test]
    fn empty_directory_message_when_tools_fail() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(preview(tmp.path(), &broken_chain()), EMPTY_MESSAGE);
    }

    #[test]
    fn unlistable_message_when_tools_fail_on_content() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "hi").unwrap();
        assert_eq!(preview(tmp.path(), &broken_chain()), UNLISTABLE_MESSAGE);
    }

    #[cfg(unix)]
    #[test]
    fn falls_through_to_the_first_working_tool() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "hi").unwrap();
        let chain = vec![
            ListingTool::new("pd-test-no-such-lister", &[]),
            ListingTool::new("ls", &[]),
        ];
        assert_eq!(preview(tmp.path(), &chain).trim(), "README.md");
    }
}
