use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use todo_core::{RunConfig, Sequence, DEFAULT_ENDPOINT};

use crate::logging::LogDestination;

/// Fetches a list of todo items from a JSON API and prints them in id order.
#[derive(Parser, Debug, Clone)]
#[command(name = "todo_fetch", version)]
pub struct Args {
    /// The amount of todo items to fetch
    #[arg(long, default_value_t = 20)]
    pub count: usize,

    /// The amount of concurrent workers to use
    #[arg(long, default_value_t = 5)]
    pub workers: usize,

    /// The timeout in seconds for each HTTP request
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// The time in seconds the whole run may take
    #[arg(long, default_value_t = 180)]
    pub deadline: u64,

    /// Print debugging output
    #[arg(long)]
    pub debug: bool,

    /// Base endpoint; ids are appended as a path segment
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Which ids to request
    #[arg(long, value_enum, default_value_t = SequenceArg::Even)]
    pub sequence: SequenceArg,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceArg {
    Even,
    Threes,
}

impl From<SequenceArg> for Sequence {
    fn from(arg: SequenceArg) -> Self {
        match arg {
            SequenceArg::Even => Sequence::Even,
            SequenceArg::Threes => Sequence::Threes,
        }
    }
}

impl Args {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            count: self.count,
            worker_limit: self.workers,
            http_timeout: Duration::from_secs(self.timeout),
            overall_deadline: Duration::from_secs(self.deadline),
            debug: self.debug,
            ..RunConfig::default()
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }
}
