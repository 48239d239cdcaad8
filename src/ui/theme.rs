//! Label colors and ANSI escape sequence generation.
//!
//! Labels shown in the fuzzy finder are painted with two colors: one for the
//! project name and one for its location. Colors come from the `[colors]` table
//! of the config file as hex strings:
//!
//! ```toml
//! [colors]
//! name = "#89b4fa"
//! location = "#6c7086"
//! ```

use serde::{Deserialize, Serialize};

/// Default project name color (Catppuccin Mocha blue).
const DEFAULT_NAME_FG: &str = "#89b4fa";

/// Default location color (Catppuccin Mocha overlay0).
const DEFAULT_LOCATION_FG: &str = "#6c7086";

/// Color scheme for selector labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    /// Project name color.
    pub name: String,
    /// Location color.
    pub location: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME_FG.to_string(),
            location: DEFAULT_LOCATION_FG.to_string(),
        }
    }
}

impl Theme {
    /// Paints a label from its name and location parts.
    ///
    /// An empty location paints the name alone. Stripping the escapes from the
    /// result gives back exactly `"{name} {location}"`.
    #[must_use]
    pub fn paint_label(&self, name: &str, location: &str) -> String {
        let name = Self::paint(name, &self.name);
        if location.is_empty() {
            name
        } else {
            format!("{name} {}", Self::paint(location, &self.location))
        }
    }

    /// Wraps `text` in a 24-bit foreground color and a reset.
    #[must_use]
    pub fn paint(text: &str, hex: &str) -> String {
        format!("{}{text}{}", Self::fg(hex), Self::reset())
    }

    /// Converts a hex color to an RGB tuple.
    ///
    /// Strips a leading `#` and returns white for anything unparsable.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// Generates an ANSI 24-bit foreground color escape sequence.
    ///
    /// ```
    /// use pd::ui::Theme;
    ///
    /// assert_eq!(Theme::fg("#89b4fa"), "\u{1b}[38;2;137;180;250m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// Returns the ANSI reset escape sequence (`\x1b[0m`).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}
