use crate::core::file_selector::strategy_for;
use crate::core::tree::generate_tree;
use crate::domain::models::{ContextDocument, DocumentMeta, SaveVariant, SelectionConfig};
use crate::infra::file_system::{display_name, format_size};
use anyhow::anyhow;
use log::{debug, info};
use std::path::{Path, PathBuf};

pub const STRUCTURE_MARKER: &str = "PROJECT STRUCTURE:";
pub const CONTENTS_MARKER: &str = "FILE CONTENTS:";
pub const PREVIEW_LINES: usize = 30;

const GUIDANCE: &str = "This is the complete context of the project. Please analyze the structure
and code to provide accurate assistance. Key files include configuration
files, source code, and documentation.

When responding, reference specific files and paths from the structure above.
";

fn rule() -> String {
    "=".repeat(60)
}

/// Runs the whole pipeline for `root`: tree, content selection, document.
pub fn build_context(
    root: &Path,
    config: &SelectionConfig,
    custom_paths: Vec<PathBuf>,
    tree_depth: usize,
) -> ContextDocument {
    info!(
        "Generating {} context for {}",
        config.selection_mode,
        root.display()
    );
    let tree = generate_tree(root, &config.ignore, tree_depth);

    let strategy = strategy_for(config.selection_mode, custom_paths);
    let content = strategy.aggregate(root, config);
    info!(
        "Collected {} files ({} bytes){}",
        content.file_count(),
        content.total_size(),
        if content.is_exhausted() { ", budget exhausted" } else { "" }
    );

    ContextDocument {
        meta: DocumentMeta {
            project_name: display_name(root),
            selection_mode: config.selection_mode,
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        tree,
        contents: content.into_string(),
    }
}

pub fn format_output(document: &ContextDocument) -> String {
    debug!(
        "Formatting document for {} ({} content bytes)",
        document.meta.project_name,
        document.contents.len()
    );
    let rule = rule();
    format!(
        "🤖 PROJECT CONTEXT FOR AI ASSISTANCE
{rule}
PROJECT: {name}
SELECTION MODE: {mode}
GENERATED: {generated}
{rule}

📁 {STRUCTURE_MARKER}
{tree}

{rule}
📝 {CONTENTS_MARKER}
{contents}

{rule}
💡 FOR AI ASSISTANT:
{GUIDANCE}",
        name = document.meta.project_name,
        mode = document.meta.selection_mode.as_str().to_uppercase(),
        generated = document.meta.generated_at,
        tree = document.tree,
        contents = document.contents,
    )
}

pub fn create_prompt_template(context: &str) -> String {
    format!(
        "You are an expert developer assistant. Below is the complete context of a project. \
Please analyze it thoroughly and provide accurate assistance.

PROJECT CONTEXT:
{context}

YOUR TASK:
Based on the project structure and code above, please:
1. Understand the project architecture and main components.
2. Identify key files, dependencies, and configuration.
3. Provide specific, actionable advice or code.

My specific request is: [DESCRIBE WHAT YOU NEED HELP WITH HERE]

Please reference specific files and paths from the project structure in your response. \
Be detailed but concise."
    )
}

/// From the structure header up to, not including, the next rule line.
pub fn structure_section(document: &str) -> anyhow::Result<String> {
    let lines: Vec<&str> = document.split('\n').collect();
    let start = find_marker(&lines, STRUCTURE_MARKER)?;
    let rule = rule();
    let end = lines[start + 1..]
        .iter()
        .position(|line| line.contains(&rule))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());
    Ok(lines[start..end].join("\n"))
}

/// From the contents header to the end of the document.
pub fn contents_section(document: &str) -> anyhow::Result<String> {
    let lines: Vec<&str> = document.split('\n').collect();
    let start = find_marker(&lines, CONTENTS_MARKER)?;
    Ok(lines[start..].join("\n"))
}

fn find_marker(lines: &[&str], marker: &str) -> anyhow::Result<usize> {
    lines
        .iter()
        .position(|line| line.contains(marker))
        .ok_or_else(|| anyhow!("Section marker '{}' not found in document", marker))
}

pub fn render_variant(document: &str, variant: SaveVariant) -> anyhow::Result<String> {
    match variant {
        SaveVariant::Full => Ok(document.to_string()),
        SaveVariant::Structure => structure_section(document),
        SaveVariant::Contents => contents_section(document),
        SaveVariant::Prompt => Ok(create_prompt_template(document)),
    }
}

pub fn default_filename(project_name: &str) -> String {
    format!("{}_context.txt", project_name)
}

/// First lines of the document plus line and size statistics.
pub fn preview(document: &str) -> String {
    let lines: Vec<&str> = document.split('\n').collect();
    let mut out = lines
        .iter()
        .take(PREVIEW_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    if lines.len() > PREVIEW_LINES {
        out.push_str(&format!(
            "\n\n... (Showing first {} of {} lines) ...",
            PREVIEW_LINES,
            lines.len()
        ));
    }
    out.push_str(&format!(
        "\n\n📊 Statistics\nTotal lines:  {}\nApprox. size: {}\n",
        lines.len(),
        format_size(document.len() as u64)
    ));
    out
}
