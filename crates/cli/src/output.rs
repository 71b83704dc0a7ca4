//! Writing command results to stdout, as text or JSON.

use serde::Serialize;

/// Output mode chosen by the global `--json` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Text,
    Json,
}

impl Output {
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    /// Print `lines` in text mode or `value` in JSON mode.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn emit<T: Serialize>(self, lines: &[String], value: &T) -> Result<(), serde_json::Error> {
        match self {
            Self::Text => print_lines(lines),
            Self::Json => print_line(&serde_json::to_string_pretty(value)?),
        }
        Ok(())
    }
}

#[allow(clippy::print_stdout)]
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[allow(clippy::print_stdout)]
pub fn print_line(line: &str) {
    println!("{line}");
}
