//! Terminal styling helpers
//!
//! Thin wrappers over owo-colors; anstream strips the codes when the
//! output is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Extension trait for the handful of styles the CLI uses
pub trait Stylize {
    /// De-emphasized secondary text
    fn muted(&self) -> String;
    /// Highlighted value (names, numbers)
    fn accent(&self) -> String;
    /// Bold lead-in text
    fn emphasis(&self) -> String;
    /// Positive outcome
    fn success(&self) -> String;
    /// Problem that does not abort the run
    fn warn(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    "✓".green().to_string()
}

/// Spinner style used while a run is in flight
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
