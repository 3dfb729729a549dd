use crate::cli::prompt::confirm;
use crate::cli::registry::{AppContext, Tool};
use crate::core::cache_cleaner::{CACHE_DIR_NAME, clean_cache_dirs, find_cache_dirs};
use crate::infra::file_system::{format_size, resolve_project_path};
use crate::infra::logger::{print_banner, print_status};
use clap::{ArgMatches, Args, Command, FromArgMatches};
use crossterm::style::Color;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// Directory to clean (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Delete without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Only report what would be removed
    #[arg(long)]
    pub dry_run: bool,
}

pub struct CleanPycacheTool;

impl Tool for CleanPycacheTool {
    fn name(&self) -> &'static str {
        "clean-pycache"
    }

    fn display_name(&self) -> &'static str {
        "🧹 Clean __pycache__"
    }

    fn description(&self) -> &'static str {
        "Remove all __pycache__ folders recursively"
    }

    fn command(&self) -> Command {
        CleanArgs::augment_args(Command::new(self.name()).about(self.description()))
    }

    fn execute(&self, matches: &ArgMatches, _ctx: &AppContext) -> anyhow::Result<()> {
        let args = CleanArgs::from_arg_matches(matches)?;
        let root = resolve_project_path(args.path.as_deref())?;

        print_banner("CLEAN PYTHON CACHE")?;
        println!("🔍 Cleaning in: {}", root.display());

        if find_cache_dirs(&root).is_empty() {
            println!("\nℹ️  No {} folders found.", CACHE_DIR_NAME);
            return Ok(());
        }

        if !args.dry_run
            && !args.yes
            && !confirm(&format!("\n⚠️  Delete all {} folders?", CACHE_DIR_NAME))?
        {
            print_status(Color::Red, "❌ Operation cancelled.")?;
            return Ok(());
        }

        let report = clean_cache_dirs(&root, args.dry_run);
        let verb = if args.dry_run { "Would delete" } else { "Deleted" };
        for removed in &report.removed {
            println!(
                "✅ {}: {} ({})",
                verb,
                removed.relative_path.display(),
                format_size(removed.size)
            );
        }
        for (path, err) in &report.failed {
            print_status(Color::Red, &format!("❌ Failed to delete {}: {}", path.display(), err))?;
        }

        print_status(Color::Green, "\n🎯 Summary:")?;
        println!("   • Folders deleted: {}", report.removed.len());
        println!("   • Space freed: {}", format_size(report.freed_bytes()));
        Ok(())
    }
}
