//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc};
use clap::Parser;

use crate::persistence::{FileStore, MemoryStore, SnapshotStore, StoreError};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pomodoro-server")]
#[command(about = "A Pomodoro timer server with persisted settings and statistics")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "5000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory for the settings and timer snapshot files
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Keep the snapshot in memory only
    #[arg(short, long, conflicts_with = "data_dir")]
    pub memory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Directory used by the file store
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(FileStore::default_dir)
    }

    /// Build the snapshot store selected on the command line
    pub fn open_store(&self) -> Result<Arc<dyn SnapshotStore>, StoreError> {
        if self.memory {
            return Ok(Arc::new(MemoryStore::new()));
        }
        Ok(Arc::new(FileStore::open(self.data_dir())?))
    }
}
