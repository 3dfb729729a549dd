use crate::domain::models::{FileRecord, SelectionConfig, SelectionMode};
use crate::infra::file_system::{read_file_truncated, walk_files};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

pub const OMITTED_MARKER: &str = "\n\n[⚠️  Total size limit reached. Some files omitted.]\n";

const SEPARATOR_WIDTH: usize = 60;

/// File names that always count as important in smart mode.
const IMPORTANT_PATTERNS: &[&str] = &[
    "README*",
    "readme*",
    "pyproject.toml",
    "package.json",
    "setup.py",
    "setup.cfg",
];

/// Extensions smart mode reads: code, web, config, docs, database.
const PRIORITY_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".jsx", ".ts", ".tsx", ".html", ".htm", ".css", ".scss", ".sass", ".json",
    ".yaml", ".yml", ".toml", ".md", ".txt", ".rst", ".sql", ".graphql", ".gql", ".java", ".cpp",
    ".c", ".h", ".hpp", ".go", ".rs", ".rb", ".php", ".cs", ".swift", ".kt", ".dart",
];

/// Reads one file for inclusion; `None` skips it.
pub type FileReader<'a> = &'a dyn Fn(&Path, usize) -> Option<String>;

pub fn format_file_block(rel_path: &str, content: &str) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    format!(
        "\n{}\n📄 FILE: {}\n{}\n{}\n",
        separator, rel_path, separator, content
    )
}

/// File blocks gathered under a soft total-size ceiling.
///
/// The ceiling is checked after each append, so the running total can pass
/// it by at most one file. Once it does, the omission marker is written and
/// every later `push` is refused.
#[derive(Debug, Clone)]
pub struct AggregatedContent {
    text: String,
    total_size: usize,
    max_total_size: usize,
    exhausted: bool,
    file_count: usize,
}

impl AggregatedContent {
    pub fn new(max_total_size: usize) -> Self {
        Self {
            text: String::new(),
            total_size: 0,
            max_total_size,
            exhausted: false,
            file_count: 0,
        }
    }

    /// Returns `false` once the budget is spent; callers stop walking.
    pub fn push(&mut self, rel_path: &str, content: &str) -> bool {
        if self.exhausted {
            return false;
        }
        self.total_size += content.len();
        self.file_count += 1;
        self.text.push_str(&format_file_block(rel_path, content));
        debug!(
            "Added {} ({} bytes, running total {})",
            rel_path,
            content.len(),
            self.total_size
        );

        if self.total_size > self.max_total_size {
            info!(
                "Total size limit of {} bytes reached after {} files",
                self.max_total_size, self.file_count
            );
            self.text.push_str(OMITTED_MARKER);
            self.exhausted = true;
            return false;
        }
        true
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

pub trait SelectionStrategy {
    fn mode(&self) -> SelectionMode;

    fn aggregate_with(
        &self,
        root: &Path,
        config: &SelectionConfig,
        reader: FileReader<'_>,
    ) -> AggregatedContent;

    fn aggregate(&self, root: &Path, config: &SelectionConfig) -> AggregatedContent {
        self.aggregate_with(root, config, &read_file_truncated)
    }
}

pub struct SmartSelection;

pub struct AllSelection;

/// Explicit files and folders, relative to the project root.
pub struct CustomSelection {
    pub paths: Vec<PathBuf>,
}

impl SelectionStrategy for SmartSelection {
    fn mode(&self) -> SelectionMode {
        SelectionMode::Smart
    }

    fn aggregate_with(
        &self,
        root: &Path,
        config: &SelectionConfig,
        reader: FileReader<'_>,
    ) -> AggregatedContent {
        let mut content = AggregatedContent::new(config.max_total_size);
        let files = walk_files(root, &config.ignore)
            .into_iter()
            .filter(|record| is_important_file(&file_name(record)));
        accumulate_records(&mut content, root, files, config, reader);
        content
    }
}

impl SelectionStrategy for AllSelection {
    fn mode(&self) -> SelectionMode {
        SelectionMode::All
    }

    fn aggregate_with(
        &self,
        root: &Path,
        config: &SelectionConfig,
        reader: FileReader<'_>,
    ) -> AggregatedContent {
        let mut content = AggregatedContent::new(config.max_total_size);
        accumulate_records(&mut content, root, walk_files(root, &config.ignore), config, reader);
        content
    }
}

impl SelectionStrategy for CustomSelection {
    fn mode(&self) -> SelectionMode {
        SelectionMode::Custom
    }

    fn aggregate_with(
        &self,
        root: &Path,
        config: &SelectionConfig,
        reader: FileReader<'_>,
    ) -> AggregatedContent {
        let existing = existing_paths(root, &self.paths);
        if existing.is_empty() {
            info!("No custom paths selected, falling back to smart selection");
            return SmartSelection.aggregate_with(root, config, reader);
        }

        let mut content = AggregatedContent::new(config.max_total_size);
        for path in existing {
            let keep_going = if path.is_dir() {
                accumulate_records(
                    &mut content,
                    root,
                    walk_files(&path, &config.ignore),
                    config,
                    reader,
                )
            } else {
                match reader(&path, config.max_file_size) {
                    Some(text) => content.push(&relative_display(root, &path), &text),
                    None => true,
                }
            };
            if !keep_going {
                break;
            }
        }
        content
    }
}

/// Strategy for `mode`; custom mode uses `custom_paths`.
pub fn strategy_for(mode: SelectionMode, custom_paths: Vec<PathBuf>) -> Box<dyn SelectionStrategy> {
    match mode {
        SelectionMode::Smart => Box::new(SmartSelection),
        SelectionMode::All => Box::new(AllSelection),
        SelectionMode::Custom => Box::new(CustomSelection {
            paths: custom_paths,
        }),
    }
}

pub fn is_important_file(name: &str) -> bool {
    if IMPORTANT_PATTERNS
        .iter()
        .any(|pattern| crate::core::ignore::matches_name_pattern(name, pattern))
    {
        return true;
    }
    match extension_of(name) {
        Some(ext) => PRIORITY_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

// Lower-cased ".ext"; leading-dot names like ".bashrc" have none
fn extension_of(name: &str) -> Option<String> {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    let idx = name[stem_start..].rfind('.')? + stem_start;
    Some(name[idx..].to_lowercase())
}

fn file_name(record: &FileRecord) -> String {
    record
        .relative_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn accumulate_records(
    content: &mut AggregatedContent,
    root: &Path,
    records: impl IntoIterator<Item = FileRecord>,
    config: &SelectionConfig,
    reader: FileReader<'_>,
) -> bool {
    for record in records {
        if config.ignore.should_ignore_file(&file_name(&record)) {
            continue;
        }
        let Some(text) = reader(&record.absolute_path, config.max_file_size) else {
            continue;
        };
        if !content.push(&relative_display(root, &record.absolute_path), &text) {
            return false;
        }
    }
    true
}

fn existing_paths(root: &Path, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter_map(|p| {
            let full = root.join(p);
            if full.exists() {
                Some(full)
            } else {
                warn!("Custom path not found: {}", p.display());
                None
            }
        })
        .collect()
}

fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ignore::context_defaults;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    fn mock_project() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("main.py"), "def main():\n    print('Hello World')").unwrap();
        fs::write(root.join("README.md"), "# Mock Project").unwrap();
        fs::write(root.join("app.log"), "Error: something failed").unwrap();
        fs::write(root.join("notes.xyz"), "opaque notes").unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/config"), "[core]\nrepositoryformatversion = 0").unwrap();
        fs::create_dir_all(root.join("utils")).unwrap();
        fs::write(root.join("utils/helper.py"), "def help(): return True").unwrap();
        temp_dir
    }

    fn config(mode: SelectionMode) -> SelectionConfig {
        SelectionConfig {
            ignore: context_defaults(),
            selection_mode: mode,
            max_file_size: 10_000,
            max_total_size: 50_000,
        }
    }

    #[test]
    fn test_format_file_block() {
        let block = format_file_block("src/main.rs", "fn main() {}");
        let sep = "=".repeat(60);
        assert_eq!(
            block,
            format!("\n{}\n📄 FILE: src/main.rs\n{}\nfn main() {{}}\n", sep, sep)
        );
    }

    #[test]
    fn test_smart_selection_filters() {
        let project = mock_project();
        let content = SmartSelection.aggregate(project.path(), &config(SelectionMode::Smart));
        let text = content.as_str();

        assert!(text.contains("def main():"));
        assert!(text.contains("# Mock Project"));
        assert!(text.contains("def help():"));
        assert!(!text.contains("Error: something failed"));
        assert!(!text.contains("opaque notes"));
        assert!(!text.contains("repositoryformatversion"));
        assert_eq!(content.file_count(), 3);
    }

    #[test]
    fn test_all_selection_reads_every_non_ignored_file() {
        let project = mock_project();
        let content = AllSelection.aggregate(project.path(), &config(SelectionMode::All));
        let text = content.as_str();

        assert!(text.contains("opaque notes"));
        assert!(text.contains("def help():"));
        assert!(!text.contains("Error: something failed"));
        assert!(!content.is_exhausted());
    }

    #[test]
    fn test_custom_selection_files_and_dirs() {
        let project = mock_project();
        let custom = CustomSelection {
            paths: vec![
                PathBuf::from("utils"),
                PathBuf::from("notes.xyz"),
                PathBuf::from("missing.py"),
            ],
        };
        let content = custom.aggregate(project.path(), &config(SelectionMode::Custom));
        let text = content.as_str();

        assert!(text.contains("def help():"));
        assert!(text.contains("📄 FILE: notes.xyz"));
        assert!(!text.contains("def main():"));
        assert!(text.find("def help():").unwrap() < text.find("opaque notes").unwrap());
    }

    #[test]
    fn test_custom_selection_falls_back_to_smart() {
        let project = mock_project();
        let cfg = config(SelectionMode::Custom);

        let empty = CustomSelection { paths: vec![] }.aggregate(project.path(), &cfg);
        let missing = CustomSelection {
            paths: vec![PathBuf::from("nope")],
        }
        .aggregate(project.path(), &cfg);
        let smart = SmartSelection.aggregate(project.path(), &cfg);

        assert_eq!(empty.as_str(), smart.as_str());
        assert_eq!(missing.as_str(), smart.as_str());
    }

    #[test]
    fn test_budget_stops_after_breach() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["a.py", "b.py", "c.py", "d.py"] {
            fs::write(temp_dir.path().join(name), "x").unwrap();
        }
        let mut cfg = config(SelectionMode::All);
        cfg.max_total_size = 250;

        let visited = RefCell::new(Vec::new());
        let reader = |path: &Path, _max: usize| -> Option<String> {
            visited.borrow_mut().push(path.to_path_buf());
            Some("y".repeat(100))
        };
        let content = AllSelection.aggregate_with(temp_dir.path(), &cfg, &reader);

        assert_eq!(visited.borrow().len(), 3);
        assert_eq!(content.file_count(), 3);
        assert_eq!(content.total_size(), 300);
        assert!(content.is_exhausted());
        assert!(content.as_str().ends_with(OMITTED_MARKER));
        assert!(!content.as_str().contains("d.py"));
    }

    #[test]
    fn test_aggregated_content_is_monotonic() {
        let mut content = AggregatedContent::new(25);
        let mut last_total = 0;
        let mut last_len = 0;
        let mut accepted = Vec::new();

        for (i, size) in [10, 0, 10, 10, 10].iter().enumerate() {
            accepted.push(content.push(&format!("f{}", i), &"z".repeat(*size)));
            assert!(content.total_size() >= last_total);
            assert!(content.as_str().len() >= last_len);
            last_total = content.total_size();
            last_len = content.as_str().len();
        }

        assert_eq!(accepted, vec![true, true, true, false, false]);
        assert_eq!(content.total_size(), 30);
        assert_eq!(content.as_str().matches(OMITTED_MARKER).count(), 1);
        assert!(!content.push("late", "more"));
        assert!(!content.as_str().contains("late"));
    }

    #[test]
    fn test_is_important_file() {
        assert!(is_important_file("README"));
        assert!(is_important_file("readme.rst"));
        assert!(is_important_file("setup.cfg"));
        assert!(is_important_file("main.PY"));
        assert!(is_important_file("lib.rs"));
        assert!(!is_important_file("app.log"));
        assert!(!is_important_file("Makefile"));
        assert!(!is_important_file(".md"));
    }

    #[test]
    fn test_strategy_for_modes() {
        assert_eq!(strategy_for(SelectionMode::Smart, vec![]).mode(), SelectionMode::Smart);
        assert_eq!(strategy_for(SelectionMode::All, vec![]).mode(), SelectionMode::All);
        assert_eq!(
            strategy_for(SelectionMode::Custom, vec![PathBuf::from("x")]).mode(),
            SelectionMode::Custom
        );
    }
}
