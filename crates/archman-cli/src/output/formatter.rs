//! Output formatter trait for CLI results.

use anyhow::Result;
use archman_core::DispatchReport;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the outcome of a successful worker run
    fn format_dispatch_report(&self, report: &DispatchReport) -> Result<()>;

    /// Format a failed invocation. Failures are already logged, so this
    /// only emits machine-readable output.
    fn format_failure(&self, operation: &str, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
