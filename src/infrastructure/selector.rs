//! Interactive selection through an external fuzzy finder.
//!
//! The finder receives one label per line on stdin and prints the chosen line
//! on stdout. Cancelling (Esc, Ctrl-C, or no match) is reported as `Ok(None)`
//! rather than an error.

use crate::domain::error::{PdError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// fzf exit status when nothing matched the query.
const EXIT_NO_MATCH: i32 = 1;

/// fzf exit status when the user aborted with Esc or Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

/// Something that lets the user pick one label out of a ranked list.
pub trait Selector {
    /// Presents `labels` in order and returns the chosen one, or `None` on
    /// cancellation. The returned label is unstyled.
    ///
    /// # Errors
    ///
    /// Returns [`PdError::Selector`] if the selector could not be run.
    fn select(&self, labels: &[String]) -> Result<Option<String>>;
}

/// [`Selector`] backed by an `fzf`-compatible subprocess.
#[derive(Debug, Clone)]
pub struct FzfSelector {
    program: String,
    preview_command: Option<String>,
}

impl FzfSelector {
    /// Creates a selector running `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            preview_command: None,
        }
    }

    /// Sets the preview command template; `{+}` is replaced by fzf with the
    /// highlighted label.
    #[must_use]
    pub fn with_preview(mut self, command: impl Into<String>) -> Self {
        self.preview_command = Some(command.into());
        self
    }

    /// Builds the preview template that calls back into this executable.
    #[must_use]
    pub fn preview_for_exe(exe: &std::path::Path) -> String {
        let exe = exe.display().to_string().replace('\'', r"'\''");
        format!("'{exe}' --fzf-preview {{+}}")
    }

    fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "--ansi",
            "--bind",
            "ctrl-b:preview-up",
            "--bind",
            "ctrl-f:preview-down",
            "--cycle",
            "--no-multi",
            "--no-sort",
            "--reverse",
            "--tiebreak=index",
        ]
        .map(String::from)
        .to_vec();

        if let Some(preview) = &self.preview_command {
            args.push(format!("--preview={preview}"));
        }
        args
    }
}

impl Selector for FzfSelector {
    fn select(&self, labels: &[String]) -> Result<Option<String>> {
        let _span = tracing::debug_span!("fzf_select", program = %self.program, label_count = labels.len())
            .entered();

        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| PdError::Selector(format!("failed to launch {}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            let input = labels.join("\n");
            // fzf may exit before reading everything; a broken pipe is not our failure.
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                tracing::debug!(error = %e, "selector closed stdin early");
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| PdError::Selector(format!("{} did not finish: {e}", self.program)))?;

        match output.status.code() {
            Some(0) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let selection = stdout.lines().next().map(str::to_string);
                tracing::debug!(selected = ?selection, "selection made");
                Ok(selection.filter(|s| !s.trim().is_empty()))
            }
            Some(EXIT_NO_MATCH | EXIT_INTERRUPTED) | None => {
                tracing::debug!(status = ?output.status, "selection cancelled");
                Ok(None)
            }
            Some(code) => Err(PdError::Selector(format!(
                "{} exited with status {code}",
                self.program
            ))),
        }
    }
}
