//! Lexical path resolution
//!
//! Paths in the configuration are plain strings that may be relative to the
//! working directory or meant to be re-rooted under an alternate rootfs.
//! Nothing here touches the filesystem except [`absolutize`], which needs
//! the current working directory.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Lexically normalize a path.
///
/// Removes `.` components, resolves `..` against preceding components and
/// drops `..` that would climb above the root. An empty result becomes `.`.
///
/// # Example
///
/// ```
/// use luet_fs::clean;
/// use std::path::PathBuf;
///
/// assert_eq!(clean("/var/./cache/../lib"), PathBuf::from("/var/lib"));
/// assert_eq!(clean("a/../.."), PathBuf::from(".."));
/// ```
pub fn clean(path: impl AsRef<Path>) -> PathBuf {
    let mut cleaned = PathBuf::new();
    let mut rooted = false;
    let mut parts: Vec<&OsStr> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::Prefix(prefix) => cleaned.push(prefix.as_os_str()),
            Component::RootDir => rooted = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| *last != OsStr::new("..")) {
                    parts.pop();
                } else if !rooted {
                    parts.push(OsStr::new(".."));
                }
            }
            Component::Normal(part) => parts.push(part),
        }
    }

    if rooted {
        cleaned.push(Component::RootDir.as_os_str());
    }
    for part in parts {
        cleaned.push(part);
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Resolve `path` to an absolute, cleaned path.
///
/// Absolute inputs are only cleaned. Relative inputs are joined onto the
/// current working directory, which is the one step that can fail.
pub fn absolutize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Ok(clean(path));
    }

    let cwd = std::env::current_dir().map_err(|source| Error::PathResolution {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(clean(dunce::simplified(&cwd).join(path)))
}

/// Join `path` underneath `base`, even when `path` is absolute.
///
/// Root and prefix components of `path` are discarded so that
/// `join_under("/mnt/target", "/var/cache")` yields `/mnt/target/var/cache`
/// instead of replacing the base the way [`Path::join`] would.
pub fn join_under(base: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    let mut joined = base.as_ref().to_path_buf();
    for component in path.as_ref().components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {}
            other => joined.push(other.as_os_str()),
        }
    }
    clean(joined)
}
