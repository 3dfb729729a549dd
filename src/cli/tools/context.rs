use crate::cli::picker::pick_paths;
use crate::cli::registry::{AppContext, Tool};
use crate::core::context_generator::{
    build_context, default_filename, format_output, preview, render_variant,
};
use crate::core::ignore::context_defaults;
use crate::domain::models::{SaveVariant, SelectionConfig, SelectionMode};
use crate::infra::file_system::resolve_project_path;
use crate::infra::logger::{print_banner, print_status};
use crate::core::tree::quick_tree;
use crate::infra::output::{char_preview, copy_to_clipboard, create_writer, save_to_file};
use clap::{ArgMatches, Args, Command, FromArgMatches};
use crossterm::style::Color;
use log::{debug, info, warn};
use std::path::PathBuf;

const PICKER_DEPTH: usize = 3;
const QUICK_TREE_DEPTH: usize = 2;

#[derive(Args, Debug, Clone)]
pub struct ContextArgs {
    /// Project root (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// File selection mode: smart, all or custom
    #[arg(long, default_value = "smart")]
    pub mode: SelectionMode,

    /// File or folder to include, relative to the project (implies custom mode)
    #[arg(short, long = "include")]
    pub include: Vec<PathBuf>,

    /// Choose custom paths in an interactive list (implies custom mode)
    #[arg(long)]
    pub pick: bool,

    /// Extra directory name to ignore
    #[arg(long = "ignore-dir", value_delimiter = ',')]
    pub ignore_dirs: Vec<String>,

    /// Extra file pattern to ignore (`*.ext`, `prefix*` or exact name)
    #[arg(long = "ignore-file", value_delimiter = ',')]
    pub ignore_files: Vec<String>,

    /// Per-file ceiling in characters
    #[arg(long)]
    pub max_file_size: Option<usize>,

    /// Soft ceiling on total content bytes
    #[arg(long)]
    pub max_total_size: Option<usize>,

    /// Tree depth limit
    #[arg(long)]
    pub depth: Option<usize>,

    /// Save the document: full, structure, contents or prompt
    #[arg(long)]
    pub save: Option<SaveVariant>,

    /// Output file (defaults to <project>_context.txt when saving)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy the result to the clipboard
    #[arg(long)]
    pub clipboard: bool,

    /// Skip the preview shown before saving
    #[arg(long)]
    pub no_preview: bool,

    /// Only print a compact tree of the first levels (see --depth) and exit
    #[arg(long)]
    pub tree: bool,
}

pub struct ContextTool;

impl ContextTool {
    fn selection_config(args: &ContextArgs, ctx: &AppContext) -> SelectionConfig {
        let context = &ctx.settings.context;
        let mut ignore = context_defaults();
        ignore.extend(&ctx.settings.ignore_dirs, &ctx.settings.ignore_files);
        ignore.extend(&context.extra_ignore_dirs, &context.extra_ignore_files);
        ignore.extend(&args.ignore_dirs, &args.ignore_files);

        let selection_mode = if !args.include.is_empty() || args.pick {
            if args.mode != SelectionMode::Custom {
                debug!("Custom paths given, switching from {} to custom mode", args.mode);
            }
            SelectionMode::Custom
        } else {
            args.mode
        };

        SelectionConfig {
            ignore,
            selection_mode,
            max_file_size: args.max_file_size.unwrap_or(context.max_file_size),
            max_total_size: args.max_total_size.unwrap_or(context.max_total_size),
        }
    }

    fn generate(&self, args: ContextArgs, ctx: &AppContext) -> anyhow::Result<()> {
        let root = resolve_project_path(args.path.as_deref())?;
        if args.tree {
            print!("{}", quick_tree(&root, args.depth.unwrap_or(QUICK_TREE_DEPTH)));
            return Ok(());
        }
        let config = Self::selection_config(&args, ctx);
        let depth = args.depth.unwrap_or(ctx.settings.context.tree_depth);
        let saving = args.save.is_some() || args.output.is_some();
        let to_console = !saving && !args.clipboard;

        if !to_console {
            print_banner("🤖 AI-PROJECT CONTEXT GENERATOR")?;
            println!("📁 Project: {}", crate::infra::file_system::display_name(&root));
            println!("📍 Location: {}", root.display());
        }

        let custom_paths = match config.selection_mode {
            SelectionMode::Custom if !args.include.is_empty() => args.include.clone(),
            SelectionMode::Custom if args.pick => pick_paths(&root, &config.ignore, PICKER_DEPTH)?,
            _ => Vec::new(),
        };
        if config.selection_mode == SelectionMode::Custom && custom_paths.is_empty() {
            warn!("No files selected. Falling back to smart selection.");
        }

        let document = build_context(&root, &config, custom_paths, depth);
        let formatted = format_output(&document);
        let variant = args.save.unwrap_or_default();
        let rendered = render_variant(&formatted, variant)?;

        if to_console {
            return create_writer(None, false).write(&rendered);
        }

        if !args.no_preview {
            print_status(Color::Cyan, "\n📋 CONTEXT PREVIEW")?;
            println!("{}", preview(&formatted));
        }

        if saving {
            let target = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(default_filename(&document.meta.project_name)));
            save_to_file(&target, &rendered)?;
            if variant == SaveVariant::Prompt {
                print_status(Color::Magenta, "\n🤖 AI Prompt Suggestion:")?;
                println!("{}\n[Full prompt saved in file]", char_preview(&rendered, 300));
            }
        }

        if args.clipboard {
            copy_to_clipboard(&rendered)?;
        }

        info!("Context generation finished");
        Ok(())
    }
}

impl Tool for ContextTool {
    fn name(&self) -> &'static str {
        "context"
    }

    fn display_name(&self) -> &'static str {
        "📄 Generate AI Context"
    }

    fn description(&self) -> &'static str {
        "Create optimized project context with filtering options for AI"
    }

    fn command(&self) -> Command {
        ContextArgs::augment_args(Command::new(self.name()).about(self.description()))
    }

    fn execute(&self, matches: &ArgMatches, ctx: &AppContext) -> anyhow::Result<()> {
        let args = ContextArgs::from_arg_matches(matches)?;
        debug!("context arguments: {:?}", args);
        self.generate(args, ctx)
    }
}
