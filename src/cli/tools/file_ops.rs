use crate::cli::prompt::confirm;
use crate::cli::registry::{AppContext, Tool};
use crate::core::file_ops::{
    ExportFormat, FileFilter, clipboard_payload, copy_path, create_file, create_folder,
    default_copy_destination, is_critical_path, move_path, path_info, remove_path,
    render_file_list, resolve,
};
use crate::infra::file_system::{format_size, list_project_files, resolve_project_path};
use crate::infra::logger::{print_banner, print_status};
use crate::infra::output::{char_preview, copy_to_clipboard, save_to_file};
use clap::{ArgMatches, Args, Command, FromArgMatches, Subcommand};
use crossterm::style::Color;
use log::warn;
use std::path::{Path, PathBuf};

const LIST_LIMIT: usize = 100;
const PATHS_ONLY_LIMIT: usize = 50;
const FALLBACK_PREVIEW: usize = 500;

#[derive(Args, Debug, Clone)]
pub struct FileOpsArgs {
    /// Base directory that relative paths resolve against
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub action: FileOpsAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FileOpsAction {
    /// List files with optional filters
    List {
        /// Case-insensitive substring of the path
        #[arg(long)]
        name: Option<String>,
        /// Extension, with or without the leading dot
        #[arg(long)]
        ext: Option<String>,
        #[arg(long)]
        min_kb: Option<u64>,
        /// Zero means no upper bound
        #[arg(long)]
        max_kb: Option<u64>,
        #[arg(long)]
        paths_only: bool,
        /// Copy every listed path to the clipboard
        #[arg(long)]
        clipboard: bool,
        /// Copy only the path with this number (1-based, implies --clipboard)
        #[arg(long, value_name = "N")]
        copy: Option<usize>,
    },
    /// Write the file list to a file
    Export {
        #[arg(short, long, default_value = "file_list.txt")]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Detailed)]
        format: ExportFormat,
    },
    /// Show size and timestamps of a file or folder
    Info { target: String },
    /// Copy a file or folder
    Copy {
        source: String,
        /// Defaults to copy_of_<name> next to the source
        dest: Option<String>,
        #[arg(long)]
        force: bool,
    },
    /// Move a file or folder into a directory
    Move {
        source: String,
        dest_dir: String,
        /// Create the destination directory if missing
        #[arg(long)]
        create: bool,
    },
    /// Delete a file or folder
    Delete {
        target: String,
        #[arg(short, long)]
        yes: bool,
        /// Allow deleting home, root or the working directory
        #[arg(long)]
        force: bool,
    },
    /// Create a folder
    Mkdir {
        name: String,
        #[arg(long)]
        readme: bool,
    },
    /// Create a file, from a template unless --empty
    New {
        name: String,
        #[arg(long)]
        empty: bool,
        #[arg(long)]
        force: bool,
    },
}

pub struct FileOpsTool;

impl FileOpsTool {
    fn run(&self, base: &Path, action: FileOpsAction) -> anyhow::Result<()> {
        match action {
            FileOpsAction::List {
                name,
                ext,
                min_kb,
                max_kb,
                paths_only,
                clipboard,
                copy,
            } => {
                let filter = FileFilter {
                    name,
                    extension: ext,
                    min_kb,
                    max_kb,
                };
                let files = filter.apply(list_project_files(base)?);
                if files.is_empty() {
                    println!("📭 No files found.");
                    return Ok(());
                }
                println!("📄 Files found: {}\n", files.len());
                let limit = if paths_only { PATHS_ONLY_LIMIT } else { LIST_LIMIT };
                let format = if paths_only {
                    ExportFormat::Simple
                } else {
                    ExportFormat::Detailed
                };
                let shown = render_file_list(&files[..files.len().min(limit)], format);
                for (number, line) in shown.lines().enumerate() {
                    println!("{:>4}. {}", number + 1, line);
                }
                if files.len() > limit {
                    println!("... and {} more", files.len() - limit);
                }
                if clipboard || copy.is_some() {
                    let payload = clipboard_payload(&files, copy)?;
                    if let Err(e) = copy_to_clipboard(&payload) {
                        warn!("{}", e);
                        print_status(Color::Yellow, "⚠️  Clipboard not available. Showing paths:")?;
                        println!("{}", char_preview(&payload, FALLBACK_PREVIEW));
                    }
                }
            }
            FileOpsAction::Export { output, format } => {
                let files = list_project_files(base)?;
                let target = resolve(base, &output.to_string_lossy());
                save_to_file(&target, &render_file_list(&files, format))?;
                println!("📄 Files exported: {}", files.len());
            }
            FileOpsAction::Info { target } => {
                let info = path_info(&resolve(base, &target))?;
                println!("📛 Name: {}", info.name);
                println!("📁 Type: {}", if info.is_file { "File" } else { "Folder" });
                println!("💾 Size: {}", format_size(info.size));
                if let Some(created) = info.created {
                    println!("📅 Created: {}", created);
                }
                if let Some(modified) = info.modified {
                    println!("✏️  Modified: {}", modified);
                }
            }
            FileOpsAction::Copy {
                source,
                dest,
                force,
            } => {
                let source = resolve(base, &source);
                let dest = match dest {
                    Some(d) => resolve(base, &d),
                    None => default_copy_destination(&source),
                };
                copy_path(&source, &dest, force)?;
                print_status(Color::Green, &format!("✅ Copied to: {}", dest.display()))?;
            }
            FileOpsAction::Move {
                source,
                dest_dir,
                create,
            } => {
                let dest = move_path(&resolve(base, &source), &resolve(base, &dest_dir), create)?;
                print_status(Color::Green, &format!("✅ Moved to: {}", dest.display()))?;
            }
            FileOpsAction::Delete { target, yes, force } => {
                let target = resolve(base, &target);
                if is_critical_path(&target) && !force {
                    anyhow::bail!(
                        "Refusing to delete critical path {} (use --force)",
                        target.display()
                    );
                }
                if !yes && !confirm(&format!("⚠️  Delete {}?", target.display()))? {
                    print_status(Color::Red, "❌ Operation cancelled.")?;
                    return Ok(());
                }
                remove_path(&target)?;
                print_status(Color::Green, &format!("✅ Deleted: {}", target.display()))?;
            }
            FileOpsAction::Mkdir { name, readme } => {
                let path = resolve(base, &name);
                create_folder(&path, readme)?;
                print_status(Color::Green, &format!("✅ Folder created: {}", path.display()))?;
            }
            FileOpsAction::New { name, empty, force } => {
                let path = resolve(base, &name);
                create_file(&path, !empty, force)?;
                print_status(Color::Green, &format!("✅ File created: {}", path.display()))?;
            }
        }
        Ok(())
    }
}

impl Tool for FileOpsTool {
    fn name(&self) -> &'static str {
        "file-ops"
    }

    fn display_name(&self) -> &'static str {
        "📁 File Operations"
    }

    fn description(&self) -> &'static str {
        "List, copy, move, delete files and folders"
    }

    fn command(&self) -> Command {
        FileOpsArgs::augment_args(Command::new(self.name()).about(self.description()))
            .subcommand_required(true)
            .arg_required_else_help(true)
    }

    fn execute(&self, matches: &ArgMatches, _ctx: &AppContext) -> anyhow::Result<()> {
        let args = FileOpsArgs::from_arg_matches(matches)?;
        let base = resolve_project_path(args.path.as_deref())?;
        print_banner("📁 FILE OPERATIONS")?;
        println!("📍 Working directory: {}\n", base.display());
        self.run(&base, args.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::Settings;
    use std::fs;
    use tempfile::TempDir;

    fn execute(argv: &[&str]) -> anyhow::Result<()> {
        let tool = FileOpsTool;
        let matches = tool.command().try_get_matches_from(argv)?;
        let ctx = AppContext {
            settings: Settings::default(),
        };
        tool.execute(&matches, &ctx)
    }

    #[test]
    fn test_parse_list_filters() {
        let matches = FileOpsTool
            .command()
            .try_get_matches_from(["file-ops", "list", "--ext", "py", "--min-kb", "1"])
            .unwrap();
        let args = FileOpsArgs::from_arg_matches(&matches).unwrap();
        match args.action {
            FileOpsAction::List {
                ext,
                min_kb,
                clipboard,
                copy,
                ..
            } => {
                assert_eq!(ext.as_deref(), Some("py"));
                assert_eq!(min_kb, Some(1));
                assert!(!clipboard);
                assert_eq!(copy, None);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_copy_number() {
        let matches = FileOpsTool
            .command()
            .try_get_matches_from(["file-ops", "list", "--copy", "2"])
            .unwrap();
        let args = FileOpsArgs::from_arg_matches(&matches).unwrap();
        assert!(matches!(args.action, FileOpsAction::List { copy: Some(2), .. }));
    }

    #[test]
    fn test_list_copy_rejects_bad_number() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.txt"), "1").unwrap();
        let base = dir.path().to_string_lossy().to_string();

        assert!(execute(&["file-ops", "--path", &base, "list", "--copy", "5"]).is_err());
    }

    #[test]
    fn test_missing_action_is_an_error() {
        assert!(FileOpsTool.command().try_get_matches_from(["file-ops"]).is_err());
    }

    #[test]
    fn test_new_copy_and_delete() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().to_string_lossy().to_string();

        execute(&["file-ops", "--path", &base, "new", "script.py"]).unwrap();
        let created = fs::read_to_string(dir.path().join("script.py")).unwrap();
        assert!(created.contains("Hello from script"));

        execute(&["file-ops", "--path", &base, "copy", "script.py"]).unwrap();
        assert!(dir.path().join("copy_of_script.py").exists());

        execute(&["file-ops", "--path", &base, "delete", "copy_of_script.py", "--yes"]).unwrap();
        assert!(!dir.path().join("copy_of_script.py").exists());
    }

    #[test]
    fn test_move_requires_existing_destination() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let base = dir.path().to_string_lossy().to_string();

        assert!(execute(&["file-ops", "--path", &base, "move", "a.txt", "archive"]).is_err());
        execute(&["file-ops", "--path", &base, "move", "a.txt", "archive", "--create"]).unwrap();
        assert!(dir.path().join("archive/a.txt").exists());
    }

    #[test]
    fn test_export_csv() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.txt"), "12345").unwrap();
        let base = dir.path().to_string_lossy().to_string();

        execute(&[
            "file-ops", "--path", &base, "export", "-o", "list.csv", "--format", "csv",
        ])
        .unwrap();
        let csv = fs::read_to_string(dir.path().join("list.csv")).unwrap();
        assert!(csv.starts_with("Path,Size(bytes),Size(human)\n"));
        assert!(csv.contains("\"data.txt\",5,"));
    }

    #[test]
    fn test_critical_delete_refused() {
        let cwd = std::env::current_dir().unwrap();
        let base = cwd.to_string_lossy().to_string();
        assert!(execute(&["file-ops", "--path", &base, "delete", ".", "--yes"]).is_err());
    }
}
