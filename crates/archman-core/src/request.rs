//! Archive manager requests and their translation into worker arguments.

use crate::error::TimeRangeError;
use crate::timestamps::check_time_range;
use std::fmt;
use std::path::Path;

/// Command that starts the in-container worker.
pub const WORKER_ENTRYPOINT: [&str; 3] = [
    "python3",
    "-m",
    "clp_package_utils.scripts.native.archive_manager",
];

const CONFIG_ARG: &str = "--config";
const BEGIN_TS_ARG: &str = "--begin-ts";
const END_TS_ARG: &str = "--end-ts";
const DRY_RUN_ARG: &str = "--dry-run";

/// Top-level worker subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerSubcommand {
    /// List archive IDs.
    Find,
    /// Delete archives.
    Delete,
}

impl WorkerSubcommand {
    /// Token the worker expects for this subcommand.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::Delete => "del",
        }
    }
}

impl fmt::Display for WorkerSubcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested subcommand of `del`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTargetKind {
    /// Delete the listed archive IDs.
    ByIds,
    /// Delete archives inside a time range.
    ByFilter,
}

impl DeleteTargetKind {
    /// Token the worker expects for this target kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByIds => "by-ids",
            Self::ByFilter => "by-filter",
        }
    }
}

impl fmt::Display for DeleteTargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lists archives whose time range falls within `[begin_ts, end_ts]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindRequest {
    /// Inclusive lower bound in epoch milliseconds.
    pub begin_ts: i64,
    /// Inclusive upper bound in epoch milliseconds, unbounded when `None`.
    pub end_ts: Option<i64>,
}

impl Default for FindRequest {
    fn default() -> Self {
        Self {
            begin_ts: 0,
            end_ts: None,
        }
    }
}

/// Which archives a delete applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Archives with the given IDs.
    ByIds(Vec<String>),
    /// Archives whose time range falls within `[begin_ts, end_ts]`.
    ByFilter {
        /// Inclusive lower bound in epoch milliseconds.
        begin_ts: i64,
        /// Inclusive upper bound in epoch milliseconds.
        end_ts: i64,
    },
}

impl DeleteTarget {
    /// Returns the nested subcommand for this target.
    pub const fn kind(&self) -> DeleteTargetKind {
        match self {
            Self::ByIds(_) => DeleteTargetKind::ByIds,
            Self::ByFilter { .. } => DeleteTargetKind::ByFilter,
        }
    }
}

/// Deletes archives, optionally as a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    /// Preview the deletion without changing anything.
    pub dry_run: bool,
    /// Archives to delete.
    pub target: DeleteTarget,
}

/// A parsed archive manager invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveRequest {
    /// `find`
    Find(FindRequest),
    /// `del`
    Delete(DeleteRequest),
}

impl ArchiveRequest {
    /// Returns the worker subcommand this request maps to.
    pub const fn subcommand(&self) -> WorkerSubcommand {
        match self {
            Self::Find(_) => WorkerSubcommand::Find,
            Self::Delete(_) => WorkerSubcommand::Delete,
        }
    }

    /// Returns the bounds that must pass time-range validation, if any.
    ///
    /// `find` is only checked when it has an upper bound; `del by-ids`
    /// carries no timestamps.
    pub const fn bounded_range(&self) -> Option<(i64, i64)> {
        match self {
            Self::Find(FindRequest {
                begin_ts,
                end_ts: Some(end_ts),
            }) => Some((*begin_ts, *end_ts)),
            Self::Delete(DeleteRequest {
                target: DeleteTarget::ByFilter { begin_ts, end_ts },
                ..
            }) => Some((*begin_ts, *end_ts)),
            Self::Find(_) | Self::Delete(_) => None,
        }
    }

    /// Validates the request's time range.
    ///
    /// # Errors
    ///
    /// Returns the reason the range was rejected.
    pub const fn validate(&self) -> Result<(), TimeRangeError> {
        match self.bounded_range() {
            Some((begin_ts, end_ts)) => check_time_range(begin_ts, end_ts),
            None => Ok(()),
        }
    }

    /// Builds the worker command line for this request.
    ///
    /// The worker parses positionally after the subcommand token, so the
    /// order produced here is the only accepted one.
    ///
    /// # Examples
    ///
    /// ```
    /// use archman_core::ArchiveRequest;
    /// use archman_core::FindRequest;
    /// use std::path::Path;
    ///
    /// let request = ArchiveRequest::Find(FindRequest::default());
    /// let args = request.worker_args(Path::new("/var/log/.cfg.yml"));
    /// assert_eq!(args[args.len() - 3..], ["find", "--begin-ts", "0"]);
    /// ```
    pub fn worker_args(&self, config_path: &Path) -> Vec<String> {
        let mut args: Vec<String> = WORKER_ENTRYPOINT.iter().map(ToString::to_string).collect();
        args.push(CONFIG_ARG.to_string());
        args.push(config_path.display().to_string());
        args.push(self.subcommand().to_string());

        match self {
            Self::Delete(delete) => {
                if delete.dry_run {
                    args.push(DRY_RUN_ARG.to_string());
                }
                args.push(delete.target.kind().to_string());
                match &delete.target {
                    DeleteTarget::ByIds(ids) => args.extend(ids.iter().cloned()),
                    DeleteTarget::ByFilter { begin_ts, end_ts } => {
                        args.push(begin_ts.to_string());
                        args.push(end_ts.to_string());
                    }
                }
            }
            Self::Find(find) => {
                args.push(BEGIN_TS_ARG.to_string());
                args.push(find.begin_ts.to_string());
                if let Some(end_ts) = find.end_ts {
                    args.push(END_TS_ARG.to_string());
                    args.push(end_ts.to_string());
                }
            }
        }

        args
    }
}
