//! CLI command definitions and dispatch.

pub mod config;
pub mod file;
pub mod folder;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
#[cfg(test)]
use montage_core::types::RootKind;
use montage_core::config::AppConfig;
use montage_core::error::AppError;
use montage_storage::StorageManager;

/// Montage: browse and manage the video and music asset buckets
#[derive(Debug, Parser)]
#[command(name = "montage", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Log storage and browser activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Folder browsing and creation
    Folder(folder::FolderArgs),
    /// File listing
    File(file::FileArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "montage=debug,montage_browser=debug,montage_storage=debug"
        } else {
            "warn"
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Folder(args) => folder::execute(args, &self.config, self.format).await,
            Commands::File(args) => file::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: build the storage manager from configuration
pub async fn create_storage(config_path: &str) -> Result<StorageManager, AppError> {
    let config = load_config(config_path)?;
    StorageManager::from_config(&config.storage).await
}
