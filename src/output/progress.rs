use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown on stderr while a scan runs.
///
/// Hidden in quiet mode or when stderr is not a TTY.
#[derive(Clone)]
pub struct ScanProgress {
    spinner: ProgressBar,
}

impl ScanProgress {
    #[must_use]
    pub fn new(message: &str, quiet: bool) -> Self {
        Self::new_with_visibility(message, quiet, std::io::stderr().is_terminal())
    }

    fn new_with_visibility(message: &str, quiet: bool, is_tty: bool) -> Self {
        let spinner = if quiet || !is_tty {
            ProgressBar::hidden()
        } else {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
            {
                spinner.set_style(style);
            }
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        };
        spinner.set_message(message.to_string());

        Self { spinner }
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.spinner.is_hidden()
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
