//! Montage folder browser
//!
//! Interactive entry point: loads configuration, wires the storage buckets
//! and runs one folder browser per root namespace over a terminal prompt.
//! On exit the session's selection is printed as JSON.

use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use montage_browser::{
    BrowserCommand, BrowserHandle, BrowserService, BrowserSnapshot, FolderBrowser, SessionContext,
};
use montage_core::config::AppConfig;
use montage_core::error::AppError;
use montage_core::types::RootKind;
use montage_core::types::folder_path::display_name;
use montage_storage::StorageManager;

/// Browse the video and music buckets and pick a folder from each
#[derive(Debug, Parser)]
#[command(name = "montage-browse", version, about, long_about = None)]
struct Args {
    /// Namespace shown first
    #[arg(short, long, default_value = "video")]
    kind: RootKind,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("MONTAGE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// What the user picked from the main menu.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MenuAction {
    Folder(String),
    SwitchKind(RootKind),
    Retry,
    DismissError,
    Done,
}

async fn run(config: AppConfig, args: Args) -> Result<(), AppError> {
    tracing::info!("Starting montage-browse v{}", env!("CARGO_PKG_VERSION"));

    let storage = Arc::new(StorageManager::from_config(&config.storage).await?);
    let session = SessionContext::new();

    let mut handles: HashMap<RootKind, BrowserHandle> = HashMap::new();
    let mut tasks = Vec::new();
    for kind in RootKind::ALL {
        let browser = FolderBrowser::new(storage.clone(), kind, Arc::new(session.consumer(kind)));
        let (handle, task) = BrowserService::spawn(browser);
        handles.insert(kind, handle);
        tasks.push(task);
    }

    let mut active = args.kind;
    loop {
        let Some(handle) = handles.get(&active) else {
            return Err(AppError::internal(format!("No browser for {active}")));
        };
        let snapshot = handle.wait_for(|s| !s.state.is_busy()).await?;

        let selection = session.selection();
        let (labels, actions) = menu(&snapshot, selection.folder(active));
        let prompt = match &snapshot.error {
            Some(error) => format!("{} folders ({})", active, error),
            None => format!("{} folders", active),
        };

        let choice = dialoguer::Select::new()
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

        let Some(action) = choice.and_then(|idx| actions.get(idx).cloned()) else {
            break;
        };

        match action {
            MenuAction::Folder(path) => folder_menu(handle, &path).await?,
            MenuAction::SwitchKind(kind) => active = kind,
            MenuAction::Retry => {
                handle.send_and_settle(BrowserCommand::Retry).await?;
            }
            MenuAction::DismissError => {
                handle.send_and_settle(BrowserCommand::DismissError).await?;
            }
            MenuAction::Done => break,
        }
    }

    for handle in handles.values() {
        handle.shutdown().await?;
    }
    for task in tasks {
        if let Err(e) = task.await {
            tracing::warn!("Browser task ended abnormally: {}", e);
        }
    }

    let selection = session.selection();
    tracing::info!(
        session_id = %session.session_id,
        complete = selection.is_complete(),
        "Session finished"
    );
    let json = serde_json::to_string_pretty(&selection)
        .map_err(|e| AppError::internal(format!("Failed to encode selection: {}", e)))?;
    println!("{}", json);

    Ok(())
}

/// Per-folder actions: open/close or use it.
async fn folder_menu(handle: &BrowserHandle, path: &str) -> Result<(), AppError> {
    let snapshot = handle.snapshot();
    let expanded = snapshot.tree.find(path).is_some_and(|n| n.is_expanded());
    let toggle_label = if expanded { "Collapse" } else { "Expand" };
    let items = [toggle_label, "Use this folder", "Back"];

    let choice = dialoguer::Select::new()
        .with_prompt(display_name(path))
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

    let command = match choice {
        Some(0) => BrowserCommand::Toggle(path.to_string()),
        Some(1) => BrowserCommand::Select(path.to_string()),
        _ => return Ok(()),
    };
    handle.send_and_settle(command).await?;
    Ok(())
}

/// Menu rows for a snapshot: visible folders first, then actions.
fn menu(snapshot: &BrowserSnapshot, selected: Option<&str>) -> (Vec<String>, Vec<MenuAction>) {
    let mut labels = Vec::new();
    let mut actions = Vec::new();

    for (depth, node) in snapshot.tree.visible() {
        let marker = if node.is_expanded() { "▾" } else { "▸" };
        let chosen = if selected == Some(node.path()) { " ✓" } else { "" };
        labels.push(format!(
            "{}{} {}{}",
            "  ".repeat(depth),
            marker,
            display_name(node.path()),
            chosen
        ));
        actions.push(MenuAction::Folder(node.path().to_string()));
    }

    // Retry stays offered after the root error is dismissed.
    if snapshot.can_retry {
        labels.push("Retry".to_string());
        actions.push(MenuAction::Retry);
    }
    if snapshot.error.is_some() {
        labels.push("Dismiss error".to_string());
        actions.push(MenuAction::DismissError);
    }

    for kind in RootKind::ALL.into_iter().filter(|k| *k != snapshot.kind) {
        labels.push(format!("Switch to {} folders", kind));
        actions.push(MenuAction::SwitchKind(kind));
    }
    labels.push("Done".to_string());
    actions.push(MenuAction::Done);

    (labels, actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    use montage_browser::{BrowserError, BrowserState, FolderTree};

    fn failed_root(error: Option<BrowserError>) -> BrowserSnapshot {
        BrowserSnapshot {
            applied: 0,
            kind: RootKind::Video,
            state: BrowserState::Ready,
            error,
            tree: FolderTree::new(),
            pending: Vec::new(),
            selected: None,
            can_retry: true,
        }
    }

    #[test]
    fn test_menu_offers_retry_after_dismiss() {
        let (labels, actions) = menu(&failed_root(None), None);
        assert!(actions.contains(&MenuAction::Retry));
        assert!(!actions.contains(&MenuAction::DismissError));
        assert_eq!(labels.last().map(String::as_str), Some("Done"));
    }

    #[test]
    fn test_menu_with_root_error() {
        let error = BrowserError::RootLoad {
            kind: RootKind::Video,
            message: "denied".to_string(),
        };
        let (_, actions) = menu(&failed_root(Some(error)), None);
        assert_eq!(
            actions,
            vec![
                MenuAction::Retry,
                MenuAction::DismissError,
                MenuAction::SwitchKind(RootKind::Music),
                MenuAction::Done,
            ]
        );
    }

    #[test]
    fn test_menu_marks_selected_folder() {
        let mut snapshot = failed_root(None);
        snapshot.can_retry = false;
        snapshot.tree = FolderTree::from_listing(&["trip_2023".to_string(), "wedding".to_string()]);
        let (labels, actions) = menu(&snapshot, Some("wedding"));
        assert_eq!(labels[0], "▸ trip 2023");
        assert_eq!(labels[1], "▸ wedding ✓");
        assert!(!actions.contains(&MenuAction::Retry));
    }
}
