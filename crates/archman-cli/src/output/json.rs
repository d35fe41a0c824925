//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use archman_core::DispatchReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct DispatchOutput<'a> {
    container_name: &'a str,
    command: &'a [String],
    removed_config: String,
}

impl OutputFormatter for JsonFormatter {
    fn format_dispatch_report(&self, report: &DispatchReport) -> Result<()> {
        let data = DispatchOutput {
            container_name: &report.container_name,
            command: &report.command,
            removed_config: report.removed_config.display().to_string(),
        };

        let output = JsonOutput::success(report.subcommand.as_str(), data);
        Self::output(&output)
    }

    fn format_failure(&self, operation: &str, message: &str) {
        let output = JsonOutput::error(operation, message);
        let _ = Self::output(&output);
    }
}
