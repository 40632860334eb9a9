//! Table, tree and JSON output for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use montage_browser::FolderTree;
use montage_core::types::RootKind;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No folders or files here.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a folder tree: an indented outline, or the whole tree as JSON
pub fn print_tree(kind: RootKind, tree: &FolderTree, format: OutputFormat) {
    match format {
        OutputFormat::Table => print!("{}", render_tree(kind, tree)),
        OutputFormat::Json => print_item(tree, format),
    }
}

/// Expanded folders show `▾`, collapsed or unloaded ones `▸`.
fn render_tree(kind: RootKind, tree: &FolderTree) -> String {
    let mut out = format!("{}/\n", kind);
    if tree.is_empty() {
        out.push_str("  (no folders)\n");
    }
    for (level, node) in tree.visible() {
        let marker = if node.is_expanded() { '▾' } else { '▸' };
        out.push_str(&format!(
            "{}{} {}  [{}]\n",
            "  ".repeat(level + 1),
            marker,
            node.name(),
            node.path()
        ));
    }
    out
}

/// Print a single value in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{:#?}", item),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print an aligned key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", key), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree_outline() {
        let tree = FolderTree::from_listing(&["trip_2023".to_string(), "wedding".to_string()]);
        let text = render_tree(RootKind::Music, &tree);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "music/");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  ▸ "));
        assert!(lines[1].ends_with("[trip_2023]"));
        assert!(lines[2].ends_with("[wedding]"));
    }

    #[test]
    fn test_render_empty_tree() {
        let text = render_tree(RootKind::Video, &FolderTree::new());
        assert_eq!(text, "video/\n  (no folders)\n");
    }
}
