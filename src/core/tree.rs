use crate::domain::models::IgnoreRules;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TREE_DEPTH: usize = 5;
pub const DEPTH_LIMIT_MARKER: &str = "└── [depth limit reached]";

/// Plain-text project tree with box-drawing connectors, as embedded in the
/// context document.
pub fn generate_tree(root: &Path, ignore: &IgnoreRules, max_depth: usize) -> String {
    debug!("Rendering tree for {} (depth {})", root.display(), max_depth);
    let mut out = String::from("Project Tree:\n");
    render_level(root, ignore, "", 0, max_depth, &mut out);
    out
}

fn render_level(
    path: &Path,
    ignore: &IgnoreRules,
    prefix: &str,
    depth: usize,
    max_depth: usize,
    out: &mut String,
) {
    if depth > max_depth {
        out.push_str(prefix);
        out.push_str(DEPTH_LIMIT_MARKER);
        out.push('\n');
        return;
    }

    let Some(entries) = sorted_entries(path) else {
        return;
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for (name, entry_path) in entries {
        if name.starts_with('.') {
            continue;
        }
        if entry_path.is_dir() {
            if !ignore.should_ignore_dir(&name) {
                dirs.push((name, entry_path, true));
            }
        } else if entry_path.is_file() {
            files.push((name, entry_path, false));
        }
    }

    let items: Vec<_> = dirs.into_iter().chain(files).collect();
    let count = items.len();
    for (idx, (name, entry_path, is_dir)) in items.into_iter().enumerate() {
        let is_last = idx + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };
        let icon = if is_dir { "📁 " } else { "📄 " };
        out.push_str(&format!("{}{}{}{}\n", prefix, connector, icon, name));

        if is_dir {
            let extension = if is_last { "    " } else { "│   " };
            let child_prefix = format!("{}{}", prefix, extension);
            render_level(&entry_path, ignore, &child_prefix, depth + 1, max_depth, out);
        }
    }
}

// Unreadable directories render as empty subtrees
fn sorted_entries(path: &Path) -> Option<Vec<(String, PathBuf)>> {
    let read_dir = match fs::read_dir(path) {
        Ok(rd) => rd,
        Err(e) => {
            debug!("Skipping unreadable directory {}: {}", path.display(), e);
            return None;
        }
    };
    let mut entries: Vec<(String, PathBuf)> = read_dir
        .filter_map(Result::ok)
        .map(|e| (e.file_name().to_string_lossy().to_string(), e.path()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Some(entries)
}

/// Compact two-space listing used while picking custom paths.
pub fn quick_tree(root: &Path, max_depth: usize) -> String {
    let mut out = String::new();
    quick_level(root, 0, max_depth, &mut out);
    out
}

fn quick_level(path: &Path, depth: usize, max_depth: usize, out: &mut String) {
    if depth > max_depth {
        return;
    }
    let Some(entries) = sorted_entries(path) else {
        return;
    };
    for (name, entry_path) in entries {
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry_path.is_dir();
        let icon = if is_dir { "📁" } else { "📄" };
        out.push_str(&format!("{}{} {}\n", "  ".repeat(depth), icon, name));
        if is_dir {
            quick_level(&entry_path, depth + 1, max_depth, out);
        }
    }
}
