use crate::domain::models::IgnoreRules;
use std::collections::BTreeSet;

pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    ".github",
    ".gitlab",
    ".venv",
    "venv",
    "env",
    "virtualenv",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".idea",
    ".vscode",
    ".vs",
    "node_modules",
    "bower_components",
    "dist",
    "build",
    "out",
    "target",
    "instance",
    ".extra",
    "migrations",
    "logs",
    "static/images",
    "media",
    "coverage",
    ".coverage",
    "site-packages",
    ".eggs",
    "eggs",
];

pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "full_project_context.txt",
    "ai_context.txt",
    "generate_context.py",
    "db.sqlite3",
    "database.db",
    "*.db",
    ".env",
    ".env.local",
    ".env.*",
    ".antigravityignore",
    ".gitignore",
    "requirements.txt",
    "requirements-dev.txt",
    "poetry.lock",
    "Pipfile.lock",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    "*.so",
    "*.dll",
    "*.dylib",
    "*.log",
    "*.tmp",
    "*.temp",
    "*.cache",
    "*.swp",
    "*.swo",
];

/// Ignore rules used by the context exporter when nothing else is configured.
pub fn context_defaults() -> IgnoreRules {
    IgnoreRules::new(
        DEFAULT_IGNORE_DIRS.iter().copied(),
        DEFAULT_IGNORE_FILES.iter().copied(),
    )
}

impl IgnoreRules {
    pub fn should_ignore_dir(&self, name: &str) -> bool {
        should_ignore_dir(name, &self.dirs)
    }

    pub fn should_ignore_file(&self, name: &str) -> bool {
        should_ignore_file(name, &self.files)
    }
}

/// Hidden directories are always skipped.
pub fn should_ignore_dir(name: &str, ignore_dirs: &BTreeSet<String>) -> bool {
    name.starts_with('.') || ignore_dirs.contains(name)
}

/// Exact name, `*suffix` or `prefix*`. Nothing else is a wildcard.
pub fn should_ignore_file<I, S>(name: &str, patterns: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .any(|pattern| matches_name_pattern(name, pattern.as_ref()))
}

pub fn matches_name_pattern(name: &str, pattern: &str) -> bool {
    if name == pattern {
        return true;
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        if name.ends_with(suffix) {
            return true;
        }
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        if name.starts_with(prefix) {
            return true;
        }
    }
    false
}
