//! Read-only directory tree helpers used during assembly.
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SipError;

/// Immediate child directories of `dir`, sorted for deterministic walks.
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, SipError> {
    if !dir.is_dir() {
        return Err(SipError::NotADirectory(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| SipError::traversal(dir, source))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SipError::traversal(dir, source))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Every regular file at any depth under `dir`, sorted.
pub fn regular_files(dir: &Path) -> Result<Vec<PathBuf>, SipError> {
    if !dir.is_dir() {
        return Err(SipError::NotADirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SipError> {
    let entries = fs::read_dir(dir).map_err(|source| SipError::traversal(dir, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| SipError::traversal(dir, source))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

/// Directory names between `base` and `file`'s parent, outermost first.
/// Empty when the file is a direct child of `base`.
pub fn relative_segments(file: &Path, base: &Path) -> Vec<String> {
    let Some(parent) = file.parent() else {
        return Vec::new();
    };
    let Ok(relative) = parent.strip_prefix(base) else {
        return Vec::new();
    };
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect()
}
