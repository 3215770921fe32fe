//! Terminal progress sink for CLI operations.

use console::Term;
use console::style;
use dirpack_core::ProgressSink;
use dirpack_core::Verbosity;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;

/// Renders core progress messages on stderr.
///
/// Normal messages are printed unless quiet. Verbose messages are printed
/// with `--verbose`; otherwise, on a TTY, the latest one is shown next to a
/// spinner. Errors are printed only in verbose mode, since the final error
/// message or the report warnings repeat them.
pub struct ConsoleSink {
    term: Term,
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    spinner: Option<ProgressBar>,
}

impl ConsoleSink {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let term = Term::stderr();
        let spinner = (!verbose && !quiet && Self::should_show(&term)).then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self {
            term,
            verbose,
            quiet,
            use_colors: console::colors_enabled_stderr(),
            spinner,
        }
    }

    /// Checks if we should show a spinner (TTY detection).
    fn should_show(term: &Term) -> bool {
        term.is_term()
    }

    fn print(&self, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| {
                let _ = self.term.write_line(line);
            }),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn write(&mut self, message: &str, verbosity: Verbosity) {
        if self.quiet {
            return;
        }

        match verbosity {
            Verbosity::Normal => {
                if self.use_colors {
                    self.print(&format!("{}", style(message).dim()));
                } else {
                    self.print(message);
                }
            }
            Verbosity::Verbose if self.verbose => self.print(message),
            Verbosity::Verbose => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message(message.to_string());
                }
            }
        }
    }

    fn write_error(&mut self, message: &str) {
        if self.verbose {
            if self.use_colors {
                self.print(&format!("{} {message}", style("error:").red().bold()));
            } else {
                self.print(&format!("error: {message}"));
            }
        }
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }
}
