use std::fmt::Write;

use crate::error::Result;
use crate::result::ScanResult;
use crate::runner::Decision;

use super::OutputFormatter;

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Use colors if stdout is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    Always,
    Never,
}

mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RESET: &str = "\x1b[0m";
}

pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self {
            use_colors: Self::should_use_colors(mode),
        }
    }

    fn should_use_colors(mode: ColorMode) -> bool {
        match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                std::io::IsTerminal::is_terminal(&std::io::stdout())
            }
        }
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        format!("{color}{text}{}", ansi::RESET)
    }

    fn format_decision(&self, decision: &Decision) -> String {
        match decision {
            Decision::Accepted => format!("✓ {}", self.paint("ACCEPTED", ansi::GREEN)),
            Decision::Rejected(_) => format!("✗ {}", self.paint("REJECTED", ansi::RED)),
        }
    }

    fn format_summary(&self, result: &ScanResult) -> String {
        let errors = result.count().to_string();
        let errors = if result.is_clean() {
            self.paint(&errors, ansi::GREEN)
        } else {
            self.paint(&errors, ansi::YELLOW)
        };
        format!(
            "Summary: {} directories scanned, {errors} errors found",
            result.scanned
        )
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(ColorMode::Auto)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &ScanResult, decision: Option<&Decision>) -> Result<String> {
        let mut output = String::new();

        if let Some(decision) = decision {
            let _ = writeln!(output, "{}", self.format_decision(decision));
        }

        for error in &result.errors {
            let _ = writeln!(
                output,
                "  {} [{}] {}",
                error.path.display(),
                error.validator_key,
                self.paint(&error.message, ansi::RED)
            );
        }

        if !result.is_clean() {
            output.push('\n');
        }
        let _ = writeln!(output, "{}", self.format_summary(result));

        Ok(output)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
