use crate::domain::models::ListedFile;
use crate::infra::file_system::{format_size, path_size};
use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, Local};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    pub name: Option<String>,
    pub extension: Option<String>,
    pub min_kb: Option<u64>,
    pub max_kb: Option<u64>,
}

impl FileFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.extension.is_none() && self.min_kb.is_none() && self.max_kb.is_none()
    }

    /// Case-insensitive substring on the path, extension suffix, and a size
    /// window in KiB where a zero maximum means unbounded.
    pub fn matches(&self, file: &ListedFile) -> bool {
        let path = file.path.to_lowercase();
        if let Some(term) = &self.name {
            if !path.contains(&term.to_lowercase()) {
                return false;
            }
        }
        if let Some(ext) = &self.extension {
            let ext = ext.to_lowercase();
            let ext = if ext.starts_with('.') { ext } else { format!(".{}", ext) };
            if !path.ends_with(&ext) {
                return false;
            }
        }
        let min = self.min_kb.unwrap_or(0) * 1024;
        let max = match self.max_kb {
            Some(kb) if kb > 0 => kb * 1024,
            _ => u64::MAX,
        };
        (min..=max).contains(&file.size)
    }

    pub fn apply(&self, files: Vec<ListedFile>) -> Vec<ListedFile> {
        files.into_iter().filter(|f| self.matches(f)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Simple,
    #[default]
    Detailed,
    Csv,
}

pub fn render_file_list(files: &[ListedFile], format: ExportFormat) -> String {
    let mut out = String::new();
    match format {
        ExportFormat::Csv => {
            out.push_str("Path,Size(bytes),Size(human)\n");
            for file in files {
                out.push_str(&format!(
                    "\"{}\",{},\"{}\"\n",
                    file.path.replace('"', "\"\""),
                    file.size,
                    format_size(file.size)
                ));
            }
        }
        ExportFormat::Detailed => {
            for file in files {
                out.push_str(&format!("{:<12} {}\n", format_size(file.size), file.path));
            }
        }
        ExportFormat::Simple => {
            for file in files {
                out.push_str(&file.path);
                out.push('\n');
            }
        }
    }
    out
}

/// Text copied by `file-ops list --clipboard`: one path by 1-based number,
/// or every path newline-joined.
pub fn clipboard_payload(files: &[ListedFile], number: Option<usize>) -> anyhow::Result<String> {
    match number {
        Some(n) => files
            .get(n.wrapping_sub(1))
            .map(|file| file.path.clone())
            .ok_or_else(|| anyhow!("Invalid file number: {} (1-{})", n, files.len())),
        None => Ok(files
            .iter()
            .map(|file| file.path.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[derive(Debug, Clone)]
pub struct PathInfo {
    pub name: String,
    pub is_file: bool,
    pub size: u64,
    pub created: Option<String>,
    pub modified: Option<String>,
}

pub fn path_info(path: &Path) -> anyhow::Result<PathInfo> {
    let metadata = fs::metadata(path).with_context(|| format!("Path not found: {}", path.display()))?;
    let stamp = |time: std::io::Result<std::time::SystemTime>| {
        time.ok()
            .map(|t| DateTime::<Local>::from(t).format("%a %b %e %H:%M:%S %Y").to_string())
    };
    Ok(PathInfo {
        name: crate::infra::file_system::display_name(path),
        is_file: metadata.is_file(),
        size: path_size(path),
        created: stamp(metadata.created()),
        modified: stamp(metadata.modified()),
    })
}

/// Joins relative inputs onto `base`.
pub fn resolve(base: &Path, input: &str) -> PathBuf {
    let path = Path::new(input.trim());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

pub fn default_copy_destination(source: &Path) -> PathBuf {
    let name = crate::infra::file_system::display_name(source);
    source
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("copy_of_{}", name))
}

pub fn copy_path(source: &Path, dest: &Path, overwrite: bool) -> anyhow::Result<()> {
    if !source.exists() {
        bail!("Source not found: {}", source.display());
    }
    if dest.exists() && !overwrite {
        bail!("Destination exists: {} (use --force to overwrite)", dest.display());
    }

    if source.is_file() {
        fs::copy(source, dest)
            .with_context(|| format!("Copy failed: {} -> {}", source.display(), dest.display()))?;
    } else {
        copy_dir_recursive(source, dest)?;
    }
    info!("Copied {} to {}", source.display(), dest.display());
    Ok(())
}

fn copy_dir_recursive(source: &Path, dest: &Path) -> anyhow::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(source)?;
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Copy failed for {}", entry.path().display()))?;
        }
    }
    Ok(())
}

/// Moves `source` into `dest_dir`, keeping its name.
pub fn move_path(source: &Path, dest_dir: &Path, create_dir: bool) -> anyhow::Result<PathBuf> {
    if !source.exists() {
        bail!("Source not found: {}", source.display());
    }
    if !dest_dir.exists() {
        if !create_dir {
            bail!("Destination directory does not exist: {} (use --create)", dest_dir.display());
        }
        fs::create_dir_all(dest_dir)?;
    }
    let name = source
        .file_name()
        .ok_or_else(|| anyhow!("Cannot move {}", source.display()))?;
    let dest = dest_dir.join(name);

    if fs::rename(source, &dest).is_err() {
        // rename fails across filesystems
        debug!("Rename failed, copying {} instead", source.display());
        copy_path(source, &dest, false)?;
        remove_path(source)?;
    }
    info!("Moved {} to {}", source.display(), dest.display());
    Ok(dest)
}

/// Home, filesystem root and the working directory need `--force`.
pub fn is_critical_path(target: &Path) -> bool {
    let canonical = fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());
    let mut critical: Vec<PathBuf> = Vec::new();
    if let Some(home) = dirs::home_dir() {
        critical.push(home);
    }
    if let Ok(cwd) = std::env::current_dir() {
        critical.push(cwd);
    }
    if canonical.parent().is_none() {
        return true;
    }
    critical
        .into_iter()
        .map(|p| fs::canonicalize(&p).unwrap_or(p))
        .any(|p| p == canonical)
}

pub fn remove_path(target: &Path) -> anyhow::Result<()> {
    if !target.exists() {
        bail!("Path not found: {}", target.display());
    }
    let result = if target.is_file() {
        fs::remove_file(target)
    } else {
        fs::remove_dir_all(target)
    };
    result.with_context(|| format!("Deletion failed: {}", target.display()))?;
    info!("Deleted {}", target.display());
    Ok(())
}

pub fn create_folder(path: &Path, with_readme: bool) -> anyhow::Result<()> {
    if path.exists() {
        bail!("Folder already exists: {}", path.display());
    }
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;
    if with_readme {
        let name = crate::infra::file_system::display_name(path);
        fs::write(path.join("README.md"), format!("# {}\n", name))?;
    }
    Ok(())
}

pub fn create_file(path: &Path, use_template: bool, overwrite: bool) -> anyhow::Result<()> {
    if path.exists() && !overwrite {
        bail!("File exists: {} (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = if use_template { file_template(path) } else { String::new() };
    fs::write(path, content.trim()).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(())
}

/// Starter content keyed by extension; unknown extensions are empty.
pub fn file_template(path: &Path) -> String {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "py" => format!(
            "def main():\n    print(\"Hello from {name}\")\n\nif __name__ == \"__main__\":\n    main()"
        ),
        "rs" => format!("fn main() {{\n    println!(\"Hello from {name}\");\n}}"),
        "html" => format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{name}</title></head>\n<body><h1>{name}</h1></body>\n</html>"
        ),
        "js" => format!("console.log(\"{name} loaded\");"),
        "md" => format!("# {name}\n\nDescription here."),
        "json" => "{\n    \"key\": \"value\"\n}".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn listed(path: &str, size: u64) -> ListedFile {
        ListedFile {
            path: path.to_string(),
            size,
        }
    }

    #[test]
    fn test_clipboard_payload() {
        let files = vec![listed("src/main.rs", 10), listed("README.md", 5)];

        assert_eq!(clipboard_payload(&files, None).unwrap(), "src/main.rs\nREADME.md");
        assert_eq!(clipboard_payload(&files, Some(2)).unwrap(), "README.md");
        assert!(clipboard_payload(&files, Some(0)).is_err());
        assert!(clipboard_payload(&files, Some(3)).is_err());
        assert_eq!(clipboard_payload(&[], None).unwrap(), "");
    }

    #[test]
    fn test_filter_by_name_ext_and_size() {
        let files = vec![
            listed("src/Main.py", 100),
            listed("src/util.rs", 4096),
            listed("docs/big.md", 10 * 1024),
        ];

        let by_name = FileFilter { name: Some("main".into()), ..Default::default() };
        assert_eq!(by_name.apply(files.clone()).len(), 1);

        let by_ext = FileFilter { extension: Some("rs".into()), ..Default::default() };
        assert_eq!(by_ext.apply(files.clone())[0].path, "src/util.rs");

        let by_size = FileFilter { min_kb: Some(4), max_kb: Some(0), ..Default::default() };
        assert_eq!(by_size.apply(files.clone()).len(), 2);

        let window = FileFilter { min_kb: Some(1), max_kb: Some(5), ..Default::default() };
        assert_eq!(window.apply(files.clone()).len(), 1);

        assert!(FileFilter::default().is_empty());
        assert_eq!(FileFilter::default().apply(files).len(), 3);
    }

    #[test]
    fn test_render_file_list_formats() {
        let files = vec![listed("a.txt", 2048)];

        assert_eq!(render_file_list(&files, ExportFormat::Simple), "a.txt\n");
        assert_eq!(
            render_file_list(&files, ExportFormat::Detailed),
            "2.00 KB      a.txt\n"
        );
        assert_eq!(
            render_file_list(&files, ExportFormat::Csv),
            "Path,Size(bytes),Size(human)\n\"a.txt\",2048,\"2.00 KB\"\n"
        );
    }

    #[test]
    fn test_copy_file_and_folder() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("pkg/inner")).unwrap();
        fs::write(root.join("pkg/inner/a.txt"), "a").unwrap();
        fs::write(root.join("single.txt"), "s").unwrap();

        let dest = default_copy_destination(&root.join("pkg"));
        assert!(dest.ends_with("copy_of_pkg"));
        copy_path(&root.join("pkg"), &dest, false).unwrap();
        assert_eq!(fs::read_to_string(dest.join("inner/a.txt")).unwrap(), "a");

        copy_path(&root.join("single.txt"), &root.join("other.txt"), false).unwrap();
        assert!(copy_path(&root.join("single.txt"), &root.join("other.txt"), false).is_err());
        assert!(copy_path(&root.join("single.txt"), &root.join("other.txt"), true).is_ok());
        assert!(copy_path(&root.join("ghost"), &root.join("x"), false).is_err());
    }

    #[test]
    fn test_move_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("note.txt"), "n").unwrap();

        assert!(move_path(&root.join("note.txt"), &root.join("archive"), false).is_err());
        let dest = move_path(&root.join("note.txt"), &root.join("archive"), true).unwrap();

        assert!(dest.ends_with("archive/note.txt"));
        assert!(dest.exists());
        assert!(!root.join("note.txt").exists());
    }

    #[test]
    fn test_remove_and_critical_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("tmp/deep")).unwrap();
        fs::write(root.join("tmp/deep/x"), "x").unwrap();

        assert!(!is_critical_path(&root.join("tmp")));
        assert!(is_critical_path(Path::new("/")));
        remove_path(&root.join("tmp")).unwrap();
        assert!(!root.join("tmp").exists());
        assert!(remove_path(&root.join("tmp")).is_err());
    }

    #[test]
    fn test_create_folder_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        create_folder(&root.join("docs"), true).unwrap();
        assert_eq!(fs::read_to_string(root.join("docs/README.md")).unwrap(), "# docs\n");
        assert!(create_folder(&root.join("docs"), false).is_err());

        create_file(&root.join("src/app.py"), true, false).unwrap();
        let content = fs::read_to_string(root.join("src/app.py")).unwrap();
        assert!(content.contains("Hello from app"));
        assert!(create_file(&root.join("src/app.py"), false, false).is_err());
        create_file(&root.join("src/app.py"), false, true).unwrap();
        assert_eq!(fs::read_to_string(root.join("src/app.py")).unwrap(), "");
    }

    #[test]
    fn test_path_info() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("info.txt");
        fs::write(&file, "12345").unwrap();

        let info = path_info(&file).unwrap();
        assert_eq!(info.name, "info.txt");
        assert!(info.is_file);
        assert_eq!(info.size, 5);
        assert!(info.modified.is_some());
        assert!(path_info(&temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_resolve_and_templates() {
        let base = Path::new("/project");
        assert_eq!(resolve(base, "src/lib.rs"), PathBuf::from("/project/src/lib.rs"));
        assert_eq!(resolve(base, "/etc/hosts"), PathBuf::from("/etc/hosts"));

        assert!(file_template(Path::new("page.html")).contains("<title>page</title>"));
        assert_eq!(file_template(Path::new("data.json")), "{\n    \"key\": \"value\"\n}");
        assert_eq!(file_template(Path::new("blob.bin")), "");
    }
}
