use crate::cli::registry::{AppContext, ToolRegistry};
use crate::infra::config::Settings;
use crate::infra::logger::{resolve_level, setup_logger};
use clap::{ArgAction, ArgMatches, Args, Command, FromArgMatches};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Shortcut for --log-level debug
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

pub fn build_cli(registry: &ToolRegistry) -> Command {
    let mut cli = GlobalArgs::augment_args(
        Command::new("mytools")
            .version(env!("CARGO_PKG_VERSION"))
            .about("🛠️ MyTools – Developer's Swiss Army Knife"),
    );
    for tool in registry.tools() {
        cli = cli.subcommand(tool.command());
    }
    cli.subcommand(Command::new("list").about("List all available tools"))
        .subcommand(Command::new("info").about("Show version and configuration"))
}

pub fn run() -> anyhow::Result<()> {
    run_from(std::env::args_os())
}

pub fn run_from<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let registry = ToolRegistry::builtin();
    let mut cli = build_cli(&registry);
    let matches = cli.clone().try_get_matches_from(args).unwrap_or_else(|e| e.exit());

    let globals = GlobalArgs::from_arg_matches(&matches)?;
    let (settings, warnings) = Settings::load(globals.config.as_deref())?;
    let level = resolve_level(
        globals.log_level.as_deref(),
        globals.debug,
        globals.verbose,
        &settings.log_level,
    );
    setup_logger(level).map_err(|e| anyhow::anyhow!("Failed to initialise logger: {}", e))?;
    if let Some(path) = &settings.config_file {
        info!("Loaded settings from {}", path.display());
    }
    for warning in &warnings {
        warn!("{}", warning);
    }
    debug!("Settings: {:?}", settings);

    let ctx = AppContext { settings };
    match matches.subcommand() {
        None => {
            cli.print_help()?;
            println!();
            Ok(())
        }
        Some(("list", _)) => {
            print!("{}", render_tool_list(&registry));
            Ok(())
        }
        Some(("info", _)) => {
            print!("{}", render_info(&ctx.settings));
            Ok(())
        }
        Some((name, sub_matches)) => dispatch(&registry, name, sub_matches, &ctx),
    }
}

fn dispatch(
    registry: &ToolRegistry,
    name: &str,
    matches: &ArgMatches,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    let tool = registry
        .create(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
    info!("Starting {}", tool.display_name());
    tool.execute(matches, ctx)
}

pub fn render_tool_list(registry: &ToolRegistry) -> String {
    let mut out = String::from("🔧 Available tools:\n");
    for tool in registry.tools() {
        out.push_str(&format!(
            "  • {:<14} – {}  {}\n",
            tool.name(),
            tool.display_name(),
            tool.description()
        ));
    }
    out
}

pub fn render_info(settings: &Settings) -> String {
    let config = settings
        .config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "default".to_string());
    format!(
        "🛠️ MyTools v{}\n💻 Platform: {} ({})\n⚙️  Config: {}\n📝 Log level: {}\n",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
        config,
        settings.log_level
    )
}
