//! Shared file collection utilities for CLI commands.

use std::path::{Path, PathBuf};

/// Directories never searched: build output and hidden directories.
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || name == "out"
}

fn is_blueprint_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("bp")
}

/// Collect all .bp files from the given paths (files or directories).
///
/// Files named explicitly are taken as-is, whatever their extension.
/// Directory results are sorted so output order is stable.
pub fn collect_bp_files(paths: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_bp_in_dir(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            anyhow::bail!("no such file or directory: {}", path.display());
        }
    }

    tracing::debug!(count = files.len(), "collected blueprint files");
    Ok(files)
}

/// Recursively collect .bp files in a directory.
fn collect_bp_in_dir(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            if is_skipped_dir(&entry.file_name().to_string_lossy()) {
                tracing::trace!(dir = %path.display(), "skipping directory");
                continue;
            }
            collect_bp_in_dir(&path, files)?;
        } else if is_blueprint_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}
