//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "archive-manager")]
#[command(author, version, about = "View or delete archives.", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Package configuration file [default: <CLP_HOME>/etc/clp-config.yml]
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List IDs of archives
    Find(FindArgs),
    /// Delete archives
    Del(DelArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct FindArgs {
    /// Time-range lower-bound (inclusive) as milliseconds from the UNIX epoch
    #[arg(
        long = "begin-ts",
        value_name = "INT",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub begin_ts: i64,

    /// Time-range upper-bound (inclusive) as milliseconds from the UNIX epoch
    #[arg(long = "end-ts", value_name = "INT", allow_negative_numbers = true)]
    pub end_ts: Option<i64>,
}

#[derive(clap::Args)]
pub struct DelArgs {
    /// Preview delete without making changes. Lists errors and files to be
    /// deleted.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub target: DelCommands,
}

#[derive(Subcommand)]
pub enum DelCommands {
    /// Delete archives by ID
    ByIds(ByIdsArgs),
    /// Delete archives within a time range
    ByFilter(ByFilterArgs),
}

#[derive(clap::Args)]
pub struct ByIdsArgs {
    /// Archive IDs to delete
    #[arg(value_name = "ID", required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(clap::Args)]
pub struct ByFilterArgs {
    /// Time-range lower-bound (inclusive) as milliseconds from the UNIX epoch
    #[arg(
        long = "begin-ts",
        value_name = "INT",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub begin_ts: i64,

    /// Time-range upper-bound (inclusive) as milliseconds from the UNIX epoch
    #[arg(long = "end-ts", value_name = "INT", required = true, allow_negative_numbers = true)]
    pub end_ts: i64,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
