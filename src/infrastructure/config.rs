use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Command line for the `recruit` terminal client.
#[derive(Debug, Parser)]
#[command(name = "recruit", version, about = "Student organization recruitment portal")]
pub struct Cli {
    /// Directory holding the persisted state and the log file.
    #[arg(long, env = "RECRUIT_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep all state in memory; nothing is written to disk.
    #[arg(long)]
    pub memory: bool,

    /// Discard the persisted state before starting.
    #[arg(long)]
    pub reset: bool,

    /// Export all applicants to a CSV file and exit.
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Simulated latency of the student id lookup, in milliseconds.
    #[arg(long, default_value_t = 800, value_name = "MS")]
    pub verify_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub in_memory: bool,
    pub reset: bool,
    pub export_csv: Option<PathBuf>,
    pub verify_delay: Duration,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            data_dir: cli.data_dir.unwrap_or_else(default_data_dir),
            in_memory: cli.memory,
            reset: cli.reset,
            export_csv: cli.export_csv,
            verify_delay: Duration::from_millis(cli.verify_delay_ms),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("recruit.log")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("recruit"))
        .unwrap_or_else(|| PathBuf::from(".recruit"))
}
