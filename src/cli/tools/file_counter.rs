use crate::cli::registry::{AppContext, Tool};
use crate::core::file_stats::collect_stats;
use crate::domain::models::ProjectStats;
use crate::infra::file_system::{display_name, format_size, resolve_project_path};
use crate::infra::logger::{print_banner, print_status};
use clap::{ArgMatches, Args, Command, FromArgMatches};
use crossterm::style::Color;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Clone)]
pub struct CounterArgs {
    /// Directory to analyse (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Extra directory name to skip
    #[arg(long = "ignore-dir", value_delimiter = ',')]
    pub ignore_dirs: Vec<String>,
}

pub struct FileCounterTool;

/// Summary header plus one row per extension, most frequent first.
pub fn render_stats(root: &Path, stats: &ProjectStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("📁 Project: {}\n", display_name(root)));
    out.push_str(&format!("📍 Path: {}\n\n", root.display()));
    out.push_str(&format!("📂 Total folders: {}\n", stats.total_dirs));
    out.push_str(&format!("📄 Total files: {}\n", stats.total_files));
    out.push_str(&format!("💾 Total size: {}\n", format_size(stats.total_size)));

    if !stats.by_extension.is_empty() {
        out.push_str(&format!("\n{:<20} {:>8} {:>14}\n", "Extension", "Files", "Size"));
        out.push_str(&format!("{}\n", "-".repeat(44)));
        for (ext, entry) in stats.sorted_by_count() {
            out.push_str(&format!(
                "{:<20} {:>8} {:>14}\n",
                ext,
                entry.count,
                format_size(entry.size)
            ));
        }
    }
    out
}

impl Tool for FileCounterTool {
    fn name(&self) -> &'static str {
        "file-counter"
    }

    fn display_name(&self) -> &'static str {
        "📊 File Statistics"
    }

    fn description(&self) -> &'static str {
        "Count files and folders by type and show size"
    }

    fn command(&self) -> Command {
        CounterArgs::augment_args(Command::new(self.name()).about(self.description()))
    }

    fn execute(&self, matches: &ArgMatches, ctx: &AppContext) -> anyhow::Result<()> {
        let args = CounterArgs::from_arg_matches(matches)?;
        let root = resolve_project_path(args.path.as_deref())?;

        let mut settings = ctx.settings.clone();
        for dir in &args.ignore_dirs {
            settings.add_ignore_dir(dir);
        }

        print_banner("📊 FILE STATISTICS")?;
        let stats = collect_stats(&root, &settings.ignore_dirs)?;
        print!("{}", render_stats(&root, &stats));
        print_status(Color::Green, "\n✅ Analysis complete")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ExtensionStats;

    #[test]
    fn test_render_stats_orders_by_count() {
        let mut stats = ProjectStats {
            total_dirs: 1,
            total_files: 3,
            total_size: 2048,
            ..Default::default()
        };
        stats
            .by_extension
            .insert(".md".to_string(), ExtensionStats { count: 1, size: 48 });
        stats
            .by_extension
            .insert(".py".to_string(), ExtensionStats { count: 2, size: 2000 });

        let out = render_stats(Path::new("/tmp/demo"), &stats);

        assert!(out.contains("📁 Project: demo"));
        assert!(out.contains("📄 Total files: 3"));
        assert!(out.contains("💾 Total size: 2.00 KB"));
        let py = out.find(".py").unwrap();
        let md = out.find(".md").unwrap();
        assert!(py < md);
    }

    #[test]
    fn test_empty_stats_have_no_table() {
        let out = render_stats(Path::new("/tmp/demo"), &ProjectStats::default());
        assert!(!out.contains("Extension"));
    }
}
