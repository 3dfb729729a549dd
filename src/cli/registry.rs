use crate::cli::tools::{
    clean_pycache::CleanPycacheTool, context::ContextTool, file_counter::FileCounterTool,
    file_ops::FileOpsTool,
};
use crate::infra::config::Settings;
use clap::{ArgMatches, Command};
use std::collections::BTreeMap;

/// Shared state handed to every tool.
pub struct AppContext {
    pub settings: Settings,
}

/// A subcommand of the dispatcher.
pub trait Tool {
    /// Command name used on the command line.
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Argument definition for this tool's subcommand.
    fn command(&self) -> Command;

    fn execute(&self, matches: &ArgMatches, ctx: &AppContext) -> anyhow::Result<()>;
}

pub type ToolFactory = fn() -> Box<dyn Tool>;

/// Name-to-factory table, filled by explicit `register` calls.
#[derive(Default)]
pub struct ToolRegistry {
    factories: BTreeMap<&'static str, ToolFactory>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("context", || -> Box<dyn Tool> { Box::new(ContextTool) });
        registry.register("clean-pycache", || -> Box<dyn Tool> {
            Box::new(CleanPycacheTool)
        });
        registry.register("file-counter", || -> Box<dyn Tool> {
            Box::new(FileCounterTool)
        });
        registry.register("file-ops", || -> Box<dyn Tool> { Box::new(FileOpsTool) });
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: ToolFactory) {
        self.factories.insert(name, factory);
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn Tool>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn tools(&self) -> impl Iterator<Item = Box<dyn Tool>> + '_ {
        self.factories.values().map(|factory| factory())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
