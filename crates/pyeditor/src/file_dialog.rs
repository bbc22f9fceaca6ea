use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::UserDirs;
use std::path::{Path, PathBuf};

use crate::config::FileType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Open,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Pending,
    Cancelled,
    Confirmed(PathBuf),
}

/// File picker drawn inside the terminal, standing in for the native open/save dialogs.
#[derive(Debug, Clone)]
pub struct FileDialog {
    kind: DialogKind,
    directory: PathBuf,
    filetypes: Vec<FileType>,
    active_filter: usize,
    default_extension: String,
    input: String,
    files: Vec<String>,
    entries: Vec<String>,
    selected: Option<usize>,
}

impl FileDialog {
    pub async fn open(
        kind: DialogKind,
        directory: PathBuf,
        filetypes: Vec<FileType>,
        default_extension: String,
    ) -> Self {
        let files = list_files(&directory).await;
        let mut dialog = Self {
            kind,
            directory,
            filetypes,
            active_filter: 0,
            default_extension,
            input: String::new(),
            files,
            entries: Vec::new(),
            selected: None,
        };
        dialog.apply_filter();
        dialog
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            DialogKind::Open => "Select a Python file to load",
            DialogKind::Save => "Save as",
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn active_filter(&self) -> Option<&FileType> {
        self.filetypes.get(self.active_filter)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        match key.code {
            KeyCode::Esc => return DialogOutcome::Cancelled,
            KeyCode::Enter => {
                if let Some(path) = self.resolve() {
                    return DialogOutcome::Confirmed(path);
                }
            }
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Backspace => {
                self.input.pop();
                self.selected = None;
            }
            KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cycle_filter();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.selected = None;
            }
            _ => {}
        }
        DialogOutcome::Pending
    }

    /// Path the dialog would return right now, if any.
    pub fn resolve(&self) -> Option<PathBuf> {
        let input = self.input.trim();
        if input.is_empty() {
            return None;
        }

        let mut path = expand_home(input)
            .filter(|path| path.is_absolute())
            .unwrap_or_else(|| self.directory.join(input));

        if self.kind == DialogKind::Save && path.extension().is_none() {
            let mut name = path.file_name()?.to_os_string();
            name.push(&self.default_extension);
            path.set_file_name(name);
        }
        Some(path)
    }

    fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let next = match self.selected {
            Some(i) if i + 1 < self.entries.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.select(next);
    }

    fn select_previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let previous = match self.selected {
            Some(i) => i.saturating_sub(1),
            None => self.entries.len() - 1,
        };
        self.select(previous);
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.input = self.entries[index].clone();
    }

    fn cycle_filter(&mut self) {
        if !self.filetypes.is_empty() {
            self.active_filter = (self.active_filter + 1) % self.filetypes.len();
            self.apply_filter();
        }
    }

    fn apply_filter(&mut self) {
        let patterns: &[String] = self
            .filetypes
            .get(self.active_filter)
            .map(|filetype| filetype.patterns.as_slice())
            .unwrap_or(&[]);

        self.entries = self
            .files
            .iter()
            .filter(|name| patterns.is_empty() || patterns.iter().any(|p| matches_pattern(p, name)))
            .cloned()
            .collect();
        self.selected = None;
    }
}

/// `*` matches everything, `*.ext` matches the extension case-insensitively,
/// anything else must match the whole name.
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.strip_prefix('*') {
        Some(suffix) => name.to_lowercase().ends_with(&suffix.to_lowercase()),
        None => pattern == name,
    }
}

fn expand_home(input: &str) -> Option<PathBuf> {
    match input.strip_prefix("~/") {
        Some(rest) => UserDirs::new().map(|dirs| dirs.home_dir().join(rest)),
        None => Some(PathBuf::from(input)),
    }
}

async fn list_files(directory: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let mut entries = match tokio::fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot list {}: {}", directory.display(), e);
            return names;
        }
    };

    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let is_file = entry
                    .file_type()
                    .await
                    .map(|file_type| file_type.is_file())
                    .unwrap_or(false);
                if is_file {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::warn!("Error while listing {}: {}", directory.display(), e);
                break;
            }
        }
    }

    names.sort();
    names
}
