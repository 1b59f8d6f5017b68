//! Extension buckets
//!
//! Maps a source file to the destination folder named after its extension.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Bucket name used for files without an extension
pub const NO_EXTENSION: &str = "no_extension";

/// Derive the bucket token for a path.
///
/// Uses [`Path::extension`], so only the last suffix counts
/// (`archive.tar.gz` -> `gz`) and a leading dot belongs to the stem
/// (`.gitignore` has no extension). A trailing dot (`name.`) yields an empty
/// extension, which is treated as none. Extensions that are not valid UTF-8
/// are kept byte for byte, unlowered.
pub fn extension_token(path: &Path) -> OsString {
    match path.extension() {
        Some(ext) if !ext.is_empty() => match ext.to_str() {
            Some(ext) => OsString::from(ext.to_lowercase()),
            None => ext.to_os_string(),
        },
        _ => OsString::from(NO_EXTENSION),
    }
}

/// Bucket directory for a token under the destination root
pub fn bucket_dir(dest_root: &Path, token: &OsStr) -> PathBuf {
    dest_root.join(token)
}
