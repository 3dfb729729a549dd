use crate::infra::file_system::path_size;
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CACHE_DIR_NAME: &str = "__pycache__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedCache {
    pub relative_path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Default)]
pub struct CleanReport {
    pub removed: Vec<RemovedCache>,
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanReport {
    pub fn freed_bytes(&self) -> u64 {
        self.removed.iter().map(|r| r.size).sum()
    }
}

/// Every `__pycache__` directory below `root`, outermost first. Matches are
/// not descended into.
pub fn find_cache_dirs(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else {
            continue;
        };
        if entry.file_type().is_dir() && entry.file_name() == CACHE_DIR_NAME {
            found.push(entry.path().to_path_buf());
            walker.skip_current_dir();
        }
    }
    debug!("Found {} cache directories under {}", found.len(), root.display());
    found
}

/// Deletes every cache directory; `dry_run` only measures them.
pub fn clean_cache_dirs(root: &Path, dry_run: bool) -> CleanReport {
    let mut report = CleanReport::default();

    for path in find_cache_dirs(root) {
        let size = path_size(&path);
        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();

        if !dry_run {
            if let Err(e) = fs::remove_dir_all(&path) {
                error!("Failed to delete {}: {}", path.display(), e);
                report.failed.push((relative_path, e.to_string()));
                continue;
            }
        }
        info!("Removed {} ({} bytes)", relative_path.display(), size);
        report.removed.push(RemovedCache {
            relative_path,
            size,
        });
    }
    report
}
