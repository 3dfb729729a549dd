use crate::domain::models::IgnoreRules;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info, warn};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};
use walkdir::WalkDir;

const HELP: &str = "↑/↓: Navigate | Space: Toggle | →/←: Expand/Collapse | a: All | n: None | Enter: Confirm | q: Done | Ctrl-C: Cancel";

#[derive(Debug, Clone)]
struct PickerEntry {
    rel_path: PathBuf,
    name: String,
    depth: usize,
    is_dir: bool,
    expanded: bool,
    selected: bool,
}

/// Selection state for the custom-path picker, kept apart from drawing.
pub struct PickerState {
    entries: Vec<PickerEntry>,
    list_state: ListState,
}

impl PickerState {
    pub fn scan(root: &Path, ignore: &IgnoreRules, max_depth: usize) -> Self {
        let mut entries = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by(|a, b| {
                b.file_type()
                    .is_dir()
                    .cmp(&a.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                if e.file_type().is_dir() {
                    !ignore.should_ignore_dir(&name)
                } else {
                    !name.starts_with('.') && !ignore.should_ignore_file(&name)
                }
            })
            .filter_map(Result::ok)
        {
            let rel_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();
            entries.push(PickerEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                rel_path,
                depth: entry.depth() - 1,
                is_dir: entry.file_type().is_dir(),
                expanded: false,
                selected: false,
            });
        }
        debug!("Picker loaded {} entries", entries.len());
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<PickerEntry>) -> Self {
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            entries,
            list_state,
        }
    }

    /// Indices of entries whose ancestors are all expanded.
    fn visible(&self) -> Vec<usize> {
        let mut visible = Vec::new();
        let mut collapsed_at: Option<usize> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if let Some(depth) = collapsed_at {
                if entry.depth > depth {
                    continue;
                }
                collapsed_at = None;
            }
            visible.push(idx);
            if entry.is_dir && !entry.expanded {
                collapsed_at = Some(entry.depth);
            }
        }
        visible
    }

    fn current(&self) -> Option<usize> {
        let visible = self.visible();
        self.list_state.selected().and_then(|i| visible.get(i).copied())
    }

    pub fn next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_selected(&mut self) {
        if let Some(idx) = self.current() {
            let entry = &mut self.entries[idx];
            entry.selected = !entry.selected;
        }
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        if let Some(idx) = self.current() {
            if self.entries[idx].is_dir {
                self.entries[idx].expanded = expanded;
            }
        }
        // keep the cursor inside the shrunken list
        let len = self.visible().len();
        if let Some(i) = self.list_state.selected() {
            if i >= len {
                self.list_state.select(len.checked_sub(1));
            }
        }
    }

    pub fn select_all(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| e.depth == 0) {
            entry.selected = true;
        }
    }

    pub fn deselect_all(&mut self) {
        for entry in &mut self.entries {
            entry.selected = false;
        }
    }

    /// Chosen paths in listing order. Entries inside a chosen folder are
    /// dropped since the folder already covers them.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        let mut chosen: Vec<PathBuf> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.selected) {
            let covered = chosen
                .iter()
                .any(|dir| entry.rel_path != *dir && entry.rel_path.starts_with(dir));
            if !covered {
                chosen.push(entry.rel_path.clone());
            }
        }
        chosen
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|e| e.selected).count()
    }
}

fn ui(f: &mut Frame, state: &mut PickerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        "🎯 Custom File Selection: pick files and folders for the context",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(title, chunks[0]);

    let highlight = Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = state
        .visible()
        .into_iter()
        .map(|idx| {
            let entry = &state.entries[idx];
            let check = if entry.selected { "[✓] " } else { "[ ] " };
            let arrow = match (entry.is_dir, entry.expanded) {
                (true, true) => "▼ 📁 ",
                (true, false) => "► 📁 ",
                (false, _) => "📄 ",
            };
            let style = if entry.selected {
                Style::default().fg(Color::Green)
            } else if entry.is_dir {
                Style::default().fg(Color::Blue)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(
                format!("{}{}{}{}", "  ".repeat(entry.depth), check, arrow, entry.name),
                style,
            ))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Paths ({} selected)", state.selected_count())),
        )
        .highlight_style(highlight);
    f.render_stateful_widget(list, chunks[1], &mut state.list_state);

    let controls = Paragraph::new(Span::styled(HELP, Style::default().fg(Color::DarkGray)));
    f.render_widget(controls, chunks[2]);
}

/// Interactive picker. An empty result means the caller falls back to smart
/// selection.
pub fn pick_paths(root: &Path, ignore: &IgnoreRules, max_depth: usize) -> anyhow::Result<Vec<PathBuf>> {
    let mut state = PickerState::scan(root, ignore, max_depth);
    if state.entries.is_empty() {
        info!("Nothing to pick under {}", root.display());
        return Ok(Vec::new());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_picker(&mut terminal, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            let selected = state.selected_paths();
            info!("Selected {} custom paths", selected.len());
            Ok(selected)
        }
        Err(err) => {
            warn!("Path selection aborted: {}", err);
            Err(err)
        }
    }
}

fn run_picker<B: Backend>(terminal: &mut Terminal<B>, state: &mut PickerState) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui(f, state))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(anyhow::anyhow!("Selection cancelled"));
            }
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => return Ok(()),
            KeyCode::Char(' ') => state.toggle_selected(),
            KeyCode::Char('a') => state.select_all(),
            KeyCode::Char('n') => state.deselect_all(),
            KeyCode::Right => state.set_expanded(true),
            KeyCode::Left => state.set_expanded(false),
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
}
