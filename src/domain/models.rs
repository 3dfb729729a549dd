use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Directory names and file-name patterns excluded from traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    pub dirs: BTreeSet<String>,
    pub files: BTreeSet<String>,
}

impl IgnoreRules {
    pub fn new<D, F>(dirs: D, files: F) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds user entries, skipping blanks.
    pub fn extend<D, F>(&mut self, dirs: D, files: F)
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        for dir in dirs {
            let dir = dir.as_ref().trim();
            if !dir.is_empty() {
                self.dirs.insert(dir.to_string());
            }
        }
        for pattern in files {
            let pattern = pattern.as_ref().trim();
            if !pattern.is_empty() {
                self.files.insert(pattern.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Smart,
    All,
    Custom,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Smart => "smart",
            SelectionMode::All => "all",
            SelectionMode::Custom => "custom",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smart" | "1" => Ok(SelectionMode::Smart),
            "all" | "2" => Ok(SelectionMode::All),
            "custom" | "3" => Ok(SelectionMode::Custom),
            other => Err(anyhow::anyhow!("Unknown selection mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub ignore: IgnoreRules,
    pub selection_mode: SelectionMode,
    pub max_file_size: usize,
    pub max_total_size: usize,
}

/// A regular file found while walking a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
    pub size_bytes: u64,
}

/// Header fields of a rendered context document.
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub project_name: String,
    pub selection_mode: SelectionMode,
    pub generated_at: String,
}

#[derive(Debug, Clone)]
pub struct ContextDocument {
    pub meta: DocumentMeta,
    pub tree: String,
    pub contents: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveVariant {
    #[default]
    Full,
    Structure,
    Contents,
    Prompt,
}

impl FromStr for SaveVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(SaveVariant::Full),
            "structure" => Ok(SaveVariant::Structure),
            "contents" => Ok(SaveVariant::Contents),
            "prompt" => Ok(SaveVariant::Prompt),
            other => Err(anyhow::anyhow!("Unknown save variant: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionStats {
    pub count: usize,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectStats {
    pub total_dirs: usize,
    pub total_files: usize,
    pub total_size: u64,
    pub by_extension: BTreeMap<String, ExtensionStats>,
}

impl ProjectStats {
    /// Extensions ordered by file count, highest first.
    pub fn sorted_by_count(&self) -> Vec<(&String, &ExtensionStats)> {
        let mut entries: Vec<_> = self.by_extension.iter().collect();
        entries.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub path: String,
    pub size: u64,
}
