//! Collision-resistant names for uploaded files.

use chrono::Utc;
use uuid::Uuid;

/// Extension of `file_name` including the leading dot, or `""`.
///
/// Dotfiles such as `.profile` have no extension; only the last component
/// of the name counts, so `clip.tar.mp4` yields `.mp4`.
pub fn extension_of(file_name: &str) -> &str {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

/// Generate a unique on-disk name: `{unix_millis}-{uuid_v4}{extension}`.
///
/// `extension` may be given with or without the leading dot. Characters
/// outside `[A-Za-z0-9]` are dropped from it so the result is always a
/// plain file name.
pub fn generate_storage_name(extension: &str) -> String {
    let ext: String = extension
        .trim_start_matches('.')
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    let stem = format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4());
    if ext.is_empty() {
        stem
    } else {
        format!("{stem}.{ext}")
    }
}
