//! Helpers for `/`-separated folder paths.

use crate::error::AppError;

/// The path delimiter used by every backend.
pub const DELIMITER: char = '/';

/// Last segment of a path, verbatim.
pub fn leaf_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(DELIMITER);
    trimmed.rsplit(DELIMITER).next().unwrap_or(trimmed)
}

/// Join a parent path and a child name.
pub fn join_path(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches(DELIMITER);
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}{DELIMITER}{name}")
    }
}

/// User-facing label for a folder path: the last segment with `_` shown
/// as a space.
pub fn display_name(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    leaf_name(path).replace('_', " ")
}

/// Normalize a user-entered folder name.
///
/// Whitespace runs become `_` and the result is lowercased. Names that are
/// empty after trimming, or that contain the delimiter, are rejected.
pub fn format_folder_name(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Please enter a folder name"));
    }
    if trimmed.contains(DELIMITER) {
        return Err(AppError::validation(format!(
            "Folder name must not contain '{DELIMITER}'"
        )));
    }

    let formatted = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    Ok(formatted)
}
