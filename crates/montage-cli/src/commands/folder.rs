//! Folder browsing and creation commands.

use std::collections::VecDeque;
use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use montage_browser::FolderBrowser;
use montage_browser::selection::NoopConsumer;
use montage_core::error::AppError;
use montage_core::traits::ListingService;
use montage_core::types::RootKind;
use montage_core::types::folder_path::{display_name, leaf_name};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List the folders directly under a prefix
    List {
        /// Root namespace (video or music)
        #[arg(short, long, default_value = "video")]
        kind: RootKind,
        /// Parent folder path (omit for top level)
        #[arg(short, long, default_value = "")]
        prefix: String,
    },
    /// Show the folder tree, expanding level by level
    Tree {
        /// Root namespace (video or music)
        #[arg(short, long, default_value = "video")]
        kind: RootKind,
        /// Max depth
        #[arg(short, long, default_value = "3")]
        depth: usize,
    },
    /// Create a new folder
    Create {
        /// Root namespace (video or music)
        #[arg(short, long, default_value = "video")]
        kind: RootKind,
        /// Folder name; normalized to lowercase with underscores
        #[arg(short, long)]
        name: String,
        /// Parent folder path (omit for top level)
        #[arg(short, long, default_value = "")]
        parent: String,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Name
    name: String,
    /// Display name
    label: String,
    /// Full path
    path: String,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let storage = super::create_storage(config_path).await?;

    match &args.command {
        FolderCommand::List { kind, prefix } => {
            let folders = storage.list_folders(*kind, prefix).await?;
            let rows: Vec<FolderRow> = folders
                .iter()
                .map(|path| FolderRow {
                    name: leaf_name(path).to_string(),
                    label: display_name(path),
                    path: path.clone(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        FolderCommand::Tree { kind, depth } => {
            let mut browser = FolderBrowser::new(Arc::new(storage), *kind, Arc::new(NoopConsumer));
            browser
                .load_root()
                .await
                .map_err(|e| AppError::external_service(e.to_string()))?;

            // Breadth-first, one level per fetch, as the interactive browser does.
            let mut queue: VecDeque<(String, usize)> = browser
                .tree()
                .roots()
                .iter()
                .map(|n| (n.path().to_string(), 1))
                .collect();

            while let Some((path, level)) = queue.pop_front() {
                if level >= *depth {
                    continue;
                }
                match browser.expand(&path).await {
                    Ok(children) => queue.extend(
                        children
                            .iter()
                            .map(|child| (child.path().to_string(), level + 1)),
                    ),
                    Err(e) => output::print_warning(&e.to_string()),
                }
            }

            output::print_tree(*kind, browser.tree(), format);
        }
        FolderCommand::Create { kind, name, parent } => {
            let path = storage.create_folder(*kind, parent, name).await?;
            output::print_success(&format!("Folder '{}' created in {} bucket", path, kind));
        }
    }

    Ok(())
}
