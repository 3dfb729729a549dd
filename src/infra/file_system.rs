use crate::domain::models::{FileRecord, IgnoreRules, ListedFile};
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{Clear, ClearType},
};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::{DirEntry, WalkDir};

pub const TRUNCATION_MARKER: &str = "\n\n...[File truncated due to size limit]...";

// Spinner line for long scans, drawn on stderr only when it is a terminal
pub struct ScanProgress {
    start_time: Instant,
    update_interval: Duration,
    last_update: Instant,
    scanned_count: usize,
    enabled: bool,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            update_interval: Duration::from_millis(250),
            last_update: Instant::now(),
            scanned_count: 0,
            enabled: io::stderr().is_terminal(),
        }
    }

    pub fn update(&mut self) -> io::Result<()> {
        self.scanned_count += 1;
        if !self.enabled {
            return Ok(());
        }

        let now = Instant::now();
        if now.duration_since(self.last_update) >= self.update_interval {
            self.last_update = now;
            let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let spinner_idx = ((now.duration_since(self.start_time).as_millis() / 100)
                % spinner_chars.len() as u128) as usize;

            let mut stderr = io::stderr();
            stderr.execute(cursor::SavePosition)?;
            stderr.execute(Clear(ClearType::CurrentLine))?;
            write!(
                stderr,
                "{} Scanning files: {} scanned",
                spinner_chars[spinner_idx], self.scanned_count
            )?;
            stderr.flush()?;
            stderr.execute(cursor::RestorePosition)?;
        }
        Ok(())
    }

    pub fn finish(&self) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let mut stderr = io::stderr();
        stderr.execute(Clear(ClearType::CurrentLine))?;
        writeln!(
            stderr,
            "✓ Scan complete: {} entries in {:.1}s",
            self.scanned_count,
            self.start_time.elapsed().as_secs_f32()
        )?;
        Ok(())
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads up to `2 * max_size` bytes, drops undecodable bytes and truncates the
/// text to `max_size` characters. `None` means empty or whitespace-only.
/// I/O failures come back as inline text so callers can render them.
pub fn read_file_truncated(path: &Path, max_size: usize) -> Option<String> {
    match read_prefix(path, max_size.saturating_mul(2)) {
        Ok(bytes) => {
            let mut content = decode_ignoring_errors(&bytes);
            if content.chars().count() > max_size {
                debug!("Truncating {} to {} characters", path.display(), max_size);
                content = content.chars().take(max_size).collect();
                content.push_str(TRUNCATION_MARKER);
            }
            if content.trim().is_empty() {
                debug!("File is empty: {}", path.display());
                None
            } else {
                Some(content)
            }
        }
        Err(e) => {
            warn!("Error reading file {}: {}", path.display(), e);
            Some(format!("[Error reading file: {}]", e))
        }
    }
}

fn read_prefix(path: &Path, limit: usize) -> io::Result<Vec<u8>> {
    let file = fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.take(limit as u64).read_to_end(&mut bytes)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

fn decode_ignoring_errors(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Top-down walk below `root`: in each directory, files come before
/// subdirectories and both are sorted by name. Directories rejected by
/// `ignore` are pruned; unreadable entries are skipped. File patterns are
/// not applied here.
pub fn walk_files(root: &Path, ignore: &IgnoreRules) -> Vec<FileRecord> {
    debug!("Walking files under {}", root.display());
    let mut records = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !ignore.should_ignore_dir(&e.file_name().to_string_lossy())
        })
        .filter_map(Result::ok)
    {
        if !is_regular_file(&entry) {
            continue;
        }
        let absolute_path = entry.path().to_path_buf();
        let relative_path = absolute_path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| absolute_path.clone());
        let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);

        records.push(FileRecord {
            relative_path,
            absolute_path,
            size_bytes,
        });
    }

    debug!("Found {} files under {}", records.len(), root.display());
    records
}

/// Every non-hidden file below `root`, sorted by relative path.
pub fn list_project_files(root: &Path) -> anyhow::Result<Vec<ListedFile>> {
    info!("Listing project files in: {}", root.display());
    let mut files = Vec::new();
    let mut progress = ScanProgress::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(Result::ok)
    {
        progress.update()?;
        if !is_regular_file(&entry) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push(ListedFile {
            path: rel.to_string_lossy().to_string(),
            size: metadata.len(),
        });
    }

    progress.finish()?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    info!("Found {} files", files.len());
    Ok(files)
}

/// Size of a file, or the summed size of every file below a directory.
pub fn path_size(path: &Path) -> u64 {
    if path.is_file() {
        return path.metadata().map(|m| m.len()).unwrap_or(0);
    }
    WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

pub fn format_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

/// Last path component, falling back to the full path for roots like `/`.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub fn resolve_project_path(path: Option<&Path>) -> anyhow::Result<PathBuf> {
    let base = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?,
    };
    // canonical form gives a real project name for inputs like "."
    Ok(fs::canonicalize(&base).unwrap_or(base))
}
