use crate::domain::models::ProjectStats;
use crate::infra::file_system::ScanProgress;
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

pub const NO_EXTENSION: &str = "[no extension]";

/// Counts folders and files below `root`, grouped by lower-cased extension.
/// Directories named in `ignore_dirs` are neither counted nor entered.
pub fn collect_stats(root: &Path, ignore_dirs: &BTreeSet<String>) -> anyhow::Result<ProjectStats> {
    info!("Collecting file statistics for {}", root.display());
    let mut stats = ProjectStats::default();
    let mut progress = ScanProgress::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir() && ignore_dirs.contains(e.file_name().to_string_lossy().as_ref()))
        })
        .filter_map(Result::ok)
    {
        progress.update()?;
        if entry.file_type().is_dir() {
            stats.total_dirs += 1;
            continue;
        }

        // unreadable sizes count as zero
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let name = entry.file_name().to_string_lossy();
        let ext = extension_key(&name);

        stats.total_files += 1;
        stats.total_size += size;
        let bucket = stats.by_extension.entry(ext).or_default();
        bucket.count += 1;
        bucket.size += size;
    }

    progress.finish()?;
    debug!(
        "{} files in {} folders, {} extensions",
        stats.total_files,
        stats.total_dirs,
        stats.by_extension.len()
    );
    Ok(stats)
}

fn extension_key(name: &str) -> String {
    match Path::new(name).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
        None => NO_EXTENSION.to_string(),
    }
}
