//! Path normalization and small helpers shared by the jail implementation.
//!
//! Virtual paths are plain strings with `/` as the only separator, whatever the host platform.
//! Host paths are `PathBuf`s and are normalized component-wise.

use std::path::{Component, Path, PathBuf};

use rand::RngCore;

/// Normalizes a virtual path.
///
/// * every `\` becomes `/`, doubled separators collapse into one;
/// * `.` segments and trailing slashes are dropped;
/// * `..` removes the previous segment. At the top of an absolute path it is discarded,
///   at the top of a relative path it is kept.
///
/// Never fails. An empty (or fully collapsed relative) path normalizes to `.`.
pub fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/").replace("//", "/");
    let is_absolute = path.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if is_absolute => {}
                _ => segments.push(segment),
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    if is_absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        String::from(".")
    } else {
        joined
    }
}

/// Joins `path` onto `base` and normalizes the result.
/// A leading `/` in `path` does not reset the join: it is appended under `base` like any
/// relative path.
pub fn join(base: &str, path: &str) -> String {
    normalize(&format!("{base}/{path}"))
}

/// Normalizes a host path without touching the filesystem.
/// `..` never climbs above the path's root.
pub fn normalize_host<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            _ => result.push(component),
        }
    }
    result
}

/// Returns a random 128-bit token rendered as 32 lowercase hex digits.
pub fn unique_name() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
