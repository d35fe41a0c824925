//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use archman_core::DispatchReport;
use console::Term;
use console::style;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled_stderr(),
            term: Term::stderr(),
        }
    }

    /// Joins a command line, quoting arguments that contain whitespace.
    fn format_command(command: &[String]) -> String {
        command
            .iter()
            .map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("'{arg}'")
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_dispatch_report(&self, report: &DispatchReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let headline = format!(
            "Archive manager `{}` finished in {}",
            report.subcommand, report.container_name
        );
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {headline}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(&headline);
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Command: {}",
                Self::format_command(&report.command)
            ));
            let _ = self.term.write_line(&format!(
                "  Removed: {}",
                report.removed_config.display()
            ));
        }

        Ok(())
    }

    fn format_failure(&self, _operation: &str, _message: &str) {}
}
