//! File listing commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use montage_core::error::AppError;
use montage_core::traits::ListingService;
use montage_core::types::RootKind;
use montage_core::types::folder_path::leaf_name;

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// List folders and files directly under a prefix
    List {
        /// Root namespace (video or music)
        #[arg(short, long, default_value = "video")]
        kind: RootKind,
        /// Folder path (omit for top level)
        #[arg(short, long, default_value = "")]
        prefix: String,
    },
}

/// Entry display row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// Name
    name: String,
    /// Folder or file
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    entry_type: String,
    /// Size
    size: String,
    /// Last modified
    modified: String,
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let storage = super::create_storage(config_path).await?;

    match &args.command {
        FileCommand::List { kind, prefix } => {
            let listing = storage.list_entries(*kind, prefix).await?;

            let folders = listing.folders.iter().map(|path| EntryRow {
                name: format!("{}/", leaf_name(path)),
                entry_type: "folder".to_string(),
                size: "-".to_string(),
                modified: "-".to_string(),
            });
            let files = listing.files.iter().map(|file| EntryRow {
                name: leaf_name(&file.path).to_string(),
                entry_type: "file".to_string(),
                size: format_size(file.size_bytes),
                modified: file
                    .last_modified
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            });
            let rows: Vec<EntryRow> = folders.chain(files).collect();

            output::print_list(&rows, format);
        }
    }

    Ok(())
}

/// Human-readable byte size.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
