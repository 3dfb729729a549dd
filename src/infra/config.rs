use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "MYTOOLS_";
const VALID_LOG_LEVELS: &[&str] = &["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

/// Options for the `context` tool.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContextSettings {
    pub max_file_size: usize,
    pub max_total_size: usize,
    pub extra_ignore_dirs: Vec<String>,
    pub extra_ignore_files: Vec<String>,
    pub tree_depth: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            max_file_size: 20_000,
            max_total_size: 200_000,
            extra_ignore_dirs: Vec::new(),
            extra_ignore_files: Vec::new(),
            tree_depth: crate::core::tree::DEFAULT_TREE_DEPTH,
        }
    }
}

/// Process-wide settings, built once in `main` and passed down by reference.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub ignore_dirs: BTreeSet<String>,
    pub ignore_files: BTreeSet<String>,
    pub log_level: String,
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
    pub context: ContextSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let dirs = [
            ".git",
            ".venv",
            "venv",
            "env",
            "__pycache__",
            ".idea",
            ".vscode",
            "node_modules",
            "dist",
            "build",
            "migrations",
            "logs",
            ".pytest_cache",
            ".mypy_cache",
        ];
        let files = [
            ".DS_Store",
            "Thumbs.db",
            "*.pyc",
            "*.pyo",
            "*.pyd",
            "*.log",
            "*.tmp",
            ".env",
            ".env.*",
            "*.db",
            "*.sqlite3",
        ];
        Self {
            ignore_dirs: dirs.iter().map(|s| s.to_string()).collect(),
            ignore_files: files.iter().map(|s| s.to_string()).collect(),
            log_level: "INFO".to_string(),
            config_file: None,
            context: ContextSettings::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file, then `MYTOOLS_*` variables.
    ///
    /// Runs before the logger exists, so problems with the overrides come
    /// back as messages for the caller to log.
    pub fn load(explicit_file: Option<&Path>) -> anyhow::Result<(Self, Vec<String>)> {
        let file = match explicit_file {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var_os(format!("{}CONFIG_FILE", ENV_PREFIX))
                .map(PathBuf::from)
                .or_else(default_config_path),
        };

        let mut settings = match file {
            Some(path) if path.exists() => Self::load_from(&path)?,
            Some(path) if explicit_file.is_some() => {
                anyhow::bail!("Config file not found: {}", path.display())
            }
            _ => Self::default(),
        };

        let mut warnings = settings.apply_env(|key| std::env::var(key).ok());
        warnings.extend(settings.normalize_log_level());
        Ok((settings, warnings))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        settings.config_file = Some(path.to_path_buf());
        Ok(settings)
    }

    /// Applies `MYTOOLS_*` overrides; list variables add comma-separated entries.
    /// The size variables set the `context` ceilings. Returns a message for
    /// every value that could not be used.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut warnings = Vec::new();

        for (name, target) in [
            ("MAX_FILE_SIZE", &mut self.context.max_file_size),
            ("MAX_TOTAL_SIZE", &mut self.context.max_total_size),
        ] {
            if let Some(value) = var(name) {
                match value.trim().parse() {
                    Ok(size) => *target = size,
                    Err(_) => warnings.push(format!(
                        "Ignoring invalid {}{}: {}",
                        ENV_PREFIX, name, value
                    )),
                }
            }
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = var("IGNORE_DIRS") {
            self.ignore_dirs.extend(split_list(&value));
        }
        if let Some(value) = var("IGNORE_FILES") {
            self.ignore_files.extend(split_list(&value));
        }
        warnings
    }

    /// Upper-cases the level; unknown values become `INFO`.
    pub fn normalize_log_level(&mut self) -> Option<String> {
        let level = self.log_level.trim().to_uppercase();
        if VALID_LOG_LEVELS.contains(&level.as_str()) {
            self.log_level = level;
            return None;
        }
        let warning = format!("Unknown log level '{}', using INFO", self.log_level);
        self.log_level = "INFO".to_string();
        Some(warning)
    }

    pub fn add_ignore_dir(&mut self, directory: &str) {
        self.ignore_dirs.insert(directory.to_string());
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("mytools").join("config.toml"))
        .filter(|path| path.exists())
}

pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.ignore_dirs.contains("node_modules"));
        assert!(settings.ignore_files.contains("*.log"));
        assert_eq!(settings.context.max_file_size, 20_000);
        assert_eq!(settings.context.max_total_size, 200_000);
        assert_eq!(settings.context.tree_depth, 5);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
log_level = "debug"
ignore_files = ["*.bak"]

[context]
max_total_size = 999
extra_ignore_dirs = ["fixtures"]
"#,
        )
        .unwrap();

        let mut settings = Settings::load_from(&path).unwrap();
        settings.normalize_log_level();

        assert_eq!(settings.log_level, "DEBUG");
        assert!(settings.ignore_files.contains("*.bak"));
        assert_eq!(settings.context.max_total_size, 999);
        assert_eq!(settings.context.max_file_size, 20_000);
        assert_eq!(settings.context.extra_ignore_dirs, vec!["fixtures"]);
        assert_eq!(settings.config_file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[context]\nmax_file_size = \"lots\"").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_apply_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("MYTOOLS_MAX_FILE_SIZE", "42"),
            ("MYTOOLS_MAX_TOTAL_SIZE", "not-a-number"),
            ("MYTOOLS_LOG_LEVEL", "warning"),
            ("MYTOOLS_IGNORE_DIRS", "fixtures, ,vendor"),
            ("MYTOOLS_IGNORE_FILES", "*.csv"),
        ]);
        let mut settings = Settings::default();
        let warnings = settings.apply_env(|key| vars.get(key).map(|v| v.to_string()));
        assert!(settings.normalize_log_level().is_none());

        assert_eq!(settings.context.max_file_size, 42);
        assert_eq!(settings.context.max_total_size, 200_000);
        assert_eq!(warnings, vec!["Ignoring invalid MYTOOLS_MAX_TOTAL_SIZE: not-a-number"]);
        assert_eq!(settings.log_level, "WARNING");
        assert!(settings.ignore_dirs.contains("fixtures"));
        assert!(settings.ignore_dirs.contains("vendor"));
        assert!(!settings.ignore_dirs.contains(""));
        assert!(settings.ignore_files.contains("*.csv"));
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let mut settings = Settings {
            log_level: "chatty".to_string(),
            ..Settings::default()
        };
        let warning = settings.normalize_log_level();
        assert_eq!(settings.log_level, "INFO");
        assert_eq!(warning.as_deref(), Some("Unknown log level 'chatty', using INFO"));
    }

    #[test]
    fn test_runtime_additions() {
        let mut settings = Settings::default();
        settings.add_ignore_dir("generated");
        assert!(settings.ignore_dirs.contains("generated"));
    }
}
