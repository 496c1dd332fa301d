//! Directory listing helpers for dataset layouts
//!
//! Results are sorted by file name so reports are reproducible across
//! platforms.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Whether a path carries a `.tif` extension (any case).
pub fn has_tif_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tif"))
}

/// List the regular `.tif` files directly inside `dir`.
pub fn list_tif_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && has_tif_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// List the subdirectories directly inside `dir`; other entries are ignored.
pub fn list_subdirectories<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
