//! Text helpers shared by the label rendering code.

use regex::Regex;
use std::sync::OnceLock;

/// CSI escape sequences (colors, resets, cursor moves).
const ANSI_PATTERN: &str = r"\x1b\[[0-9;?]*[ -/]*[@-~]";

fn ansi_regex() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    ANSI.get_or_init(|| Regex::new(ANSI_PATTERN).expect("ANSI pattern is a valid regex"))
}

/// Removes ANSI escape sequences, leaving the text a terminal would display.
///
/// This is the text fzf prints for a selection when run with `--ansi`.
///
/// ```
/// use pd::ui::strip_ansi;
///
/// assert_eq!(strip_ansi("\u{1b}[38;2;1;2;3mpd\u{1b}[0m ~"), "pd ~");
/// ```
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ansi_regex().replace_all(text, "").into_owned()
}
