// Key helpers shared across storage operations
use crate::storage::constants::FOLDER_SEPARATOR;

/// Normalize a folder name into its marker key: no leading separator,
/// exactly one trailing separator. The bucket root normalizes to "".
pub fn folder_key(name: &str) -> String {
    let trimmed = name.trim_matches(FOLDER_SEPARATOR);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}{FOLDER_SEPARATOR}")
    }
}

/// Normalize an object key by stripping leading separators.
pub fn object_key(name: &str) -> String {
    name.trim_start_matches(FOLDER_SEPARATOR).to_string()
}

pub fn is_folder_key(key: &str) -> bool {
    key.ends_with(FOLDER_SEPARATOR)
}

/// Re-root `key` from the `src` folder prefix onto the `dest` folder prefix.
/// Returns `None` when `key` does not live under `src`.
pub fn rebase_key(key: &str, src: &str, dest: &str) -> Option<String> {
    let key = key.trim_start_matches(FOLDER_SEPARATOR);
    key.strip_prefix(src).map(|rest| format!("{dest}{rest}"))
}

/// Number of separators in a key, used to order folder markers by depth.
pub fn depth(key: &str) -> usize {
    key.trim_end_matches(FOLDER_SEPARATOR)
        .matches(FOLDER_SEPARATOR)
        .count()
}

/// Folder keys strictly below `root` that are parents of any of `keys`,
/// whether or not a marker object exists for them.
pub fn implied_folders<'a>(keys: impl IntoIterator<Item = &'a str>, root: &str) -> Vec<String> {
    let mut folders = Vec::new();
    for key in keys {
        let Some(rest) = key.strip_prefix(root) else {
            continue;
        };
        let rest = rest.trim_end_matches(FOLDER_SEPARATOR);
        for (idx, _) in rest.match_indices(FOLDER_SEPARATOR) {
            folders.push(format!("{root}{}", &rest[..=idx]));
        }
    }
    folders.sort();
    folders.dedup();
    folders
}

/// Last component of a local path, used as the default upload key.
pub fn basename(path: &std::path::Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().to_string())
}
