//! Delimiter-based grouping of flat object keys into one listing level.
//!
//! Object stores have no folders: a "folder" is a key prefix ending in the
//! delimiter. These helpers reproduce `ListObjectsV2` delimiter semantics
//! for backends that only hold flat keys.

use std::collections::HashSet;

use montage_core::traits::storage::{Listing, StorageObjectMeta};
use montage_core::types::folder_path::DELIMITER;

/// The request prefix for listing the children of `path`: `""` for the
/// root, otherwise the path with exactly one trailing delimiter.
pub fn list_prefix(path: &str) -> String {
    let trimmed = path.trim_matches(DELIMITER);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}{DELIMITER}")
    }
}

/// Convert a returned common prefix (`"a/b/"`) into a folder path (`"a/b"`).
pub fn folder_from_prefix(common_prefix: &str) -> String {
    common_prefix.trim_end_matches(DELIMITER).to_string()
}

/// Group flat objects into the immediate folders and files under `path`.
///
/// Folders appear in the order their first key is seen. The placeholder
/// object for the listed folder itself (`"path/"`) is skipped.
pub fn group_keys<'a, I>(objects: I, path: &str) -> Listing
where
    I: IntoIterator<Item = &'a StorageObjectMeta>,
{
    let prefix = list_prefix(path);
    let mut seen = HashSet::new();
    let mut listing = Listing::default();

    for object in objects {
        let Some(rest) = object.path.strip_prefix(&prefix) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        match rest.find(DELIMITER) {
            Some(idx) => {
                let folder = format!("{prefix}{}", &rest[..idx]);
                if seen.insert(folder.clone()) {
                    listing.folders.push(folder);
                }
            }
            None => listing.files.push(object.clone()),
        }
    }

    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(path: &str) -> StorageObjectMeta {
        StorageObjectMeta {
            path: path.to_string(),
            size_bytes: 1,
            last_modified: None,
            is_directory: false,
        }
    }

    #[test]
    fn test_list_prefix() {
        assert_eq!(list_prefix(""), "");
        assert_eq!(list_prefix("/"), "");
        assert_eq!(list_prefix("trip_2023"), "trip_2023/");
        assert_eq!(list_prefix("trip_2023/"), "trip_2023/");
    }

    #[test]
    fn test_folder_from_prefix() {
        assert_eq!(folder_from_prefix("trip_2023/day1/"), "trip_2023/day1");
    }

    #[test]
    fn test_group_root() {
        let objects = vec![
            object("intro.mp4"),
            object("trip_2023/day1/a.mp4"),
            object("trip_2023/day2/b.mp4"),
            object("wedding/"),
        ];

        let listing = group_keys(&objects, "");
        assert_eq!(listing.folders, vec!["trip_2023", "wedding"]);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].path, "intro.mp4");
    }

    #[test]
    fn test_group_nested_skips_placeholder() {
        let objects = vec![
            object("trip_2023/"),
            object("trip_2023/cover.jpg"),
            object("trip_2023/day1/"),
            object("trip_2023/day2/b.mp4"),
            object("wedding/c.mp4"),
        ];

        let listing = group_keys(&objects, "trip_2023");
        assert_eq!(listing.folders, vec!["trip_2023/day1", "trip_2023/day2"]);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].path, "trip_2023/cover.jpg");
    }
}
