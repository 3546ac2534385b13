//! Process configuration resolved from flags and environment.

use clap::Parser;
use libris_core::default_log_level;
use std::io;
use std::path::{Path, PathBuf};

/// Single-user library catalog manager.
#[derive(Debug, Parser)]
#[command(name = "libris", version)]
pub struct Cli {
    /// Path of the SQLite catalog database; created when missing.
    #[arg(long = "db", env = "LIBRIS_DB", default_value = "library.db")]
    pub db_path: PathBuf,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "LIBRIS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files [default: ./logs].
    #[arg(long, env = "LIBRIS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved settings handed to the rest of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Always absolute.
    pub log_dir: PathBuf,
}

impl Cli {
    /// Fills defaults and makes the log directory absolute.
    pub fn resolve(self) -> io::Result<CliConfig> {
        let cwd = std::env::current_dir()?;
        Ok(self.resolve_against(&cwd))
    }

    fn resolve_against(self, cwd: &Path) -> CliConfig {
        let log_dir = match self.log_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd.join("logs"),
        };

        CliConfig {
            db_path: self.db_path,
            log_level: self
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        }
    }
}
