#[cfg(feature = "clipboard-support")]
use clipboard::{ClipboardContext, ClipboardProvider};
use anyhow::Context;
use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};
use log::{debug, info};
#[cfg(feature = "clipboard-support")]
use log::warn;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub trait OutputWriter {
    fn write(&self, content: &str) -> anyhow::Result<()>;
}

pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to file: {}", self.path.display());
        fs::write(&self.path, content)
            .with_context(|| format!("Error saving file {}", self.path.display()))?;
        info!("Output written to file: {}", self.path.display());
        Ok(())
    }
}

pub struct ConsoleWriter;

impl OutputWriter for ConsoleWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to console");
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(feature = "clipboard-support")]
pub struct ClipboardWriter;

#[cfg(feature = "clipboard-support")]
impl OutputWriter for ClipboardWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to clipboard");

        let mut ctx: ClipboardContext = match ClipboardProvider::new() {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
                return Err(anyhow::anyhow!("Failed to access clipboard: {}", e));
            }
        };

        match ctx.set_contents(content.to_owned()) {
            Ok(_) => {
                info!("Output copied to clipboard (size: {} bytes)", content.len());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to copy to clipboard: {}", e);
                Err(anyhow::anyhow!("Failed to copy to clipboard: {}", e))
            }
        }
    }
}

#[cfg(not(feature = "clipboard-support"))]
pub struct ClipboardWriter;

#[cfg(not(feature = "clipboard-support"))]
impl OutputWriter for ClipboardWriter {
    fn write(&self, _content: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!(
            "Clipboard support is disabled in this build (enable the clipboard-support feature)"
        ))
    }
}

pub fn create_writer(output_path: Option<&Path>, clipboard_output: bool) -> Box<dyn OutputWriter> {
    if clipboard_output {
        return Box::new(ClipboardWriter);
    }

    match output_path {
        Some(path) => Box::new(FileWriter::new(path)),
        None => Box::new(ConsoleWriter),
    }
}

/// Saves `content` to `path` and reports the absolute location.
pub fn save_to_file(path: &Path, content: &str) -> anyhow::Result<PathBuf> {
    FileWriter::new(path).write(content)?;
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Green))?;
    writeln!(stdout, "\n✅ Saved successfully to: {}", absolute.display())?;
    stdout.execute(ResetColor)?;
    Ok(absolute)
}

pub fn copy_to_clipboard(content: &str) -> anyhow::Result<()> {
    ClipboardWriter.write(content)?;

    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Green))?;
    writeln!(stdout, "\n📋 Content copied to clipboard!")?;
    stdout.execute(ResetColor)?;
    writeln!(stdout, "\nPreview of copied content:\n")?;
    writeln!(stdout, "{}", char_preview(content, 300))?;
    Ok(())
}

/// First `limit` characters, with an ellipsis when cut.
pub fn char_preview(content: &str, limit: usize) -> String {
    if content.chars().count() > limit {
        let safe_substring: String = content.chars().take(limit).collect();
        format!("{}...", safe_substring)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_file_writer() {
        let temp_file = NamedTempFile::new().unwrap();
        let writer = FileWriter::new(temp_file.path());
        let content = "Test output";

        writer.write(content).unwrap();

        let read_content = fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(read_content, content);
    }

    #[test]
    fn test_file_writer_reports_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.txt");

        let err = FileWriter::new(&path).write("x").unwrap_err();
        assert!(err.to_string().contains("Error saving file"));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_to_file_returns_absolute_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ctx.txt");

        let saved = save_to_file(&path, "full context").unwrap();
        assert!(saved.is_absolute());
        assert_eq!(fs::read_to_string(&path).unwrap(), "full context");
    }

    #[test]
    fn test_create_writer() {
        let file_writer = create_writer(Some(Path::new("test.txt")), false);
        assert_eq!(
            std::any::type_name_of_val(&*file_writer),
            "dyn mytools::infra::output::OutputWriter"
        );

        let console_writer = create_writer(None, false);
        assert_eq!(
            std::any::type_name_of_val(&*console_writer),
            "dyn mytools::infra::output::OutputWriter"
        );
    }

    #[test]
    fn test_utf8_safe_preview() {
        let content =
            "اهلا مرحب عبدالله 🚀 This string has UTF-8 characters like: ├── ./src/file.rs";

        let preview = char_preview(content, 20);
        assert_eq!(preview.chars().count(), 23);
        assert!(preview.ends_with("..."));
        assert_eq!(char_preview("short", 20), "short");
    }
}
