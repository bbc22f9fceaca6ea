use anyhow::{Context, Result};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use mcpi::MinecraftProbe;
use pyexec::{RunEvent, RunHandle, ScriptRunner};
use ratatui::layout::Rect;
use std::path::{Path, PathBuf};

use crate::commands::Command;
use crate::config::Config;
use crate::editor::{Editor, EventFlow};
use crate::file_dialog::{DialogKind, DialogOutcome, FileDialog};
use crate::highlight::Highlighter;
use crate::output_pane::OutputPane;
use crate::scripts::{DEFAULT_MCPI_SCRIPT, DEFAULT_SCRIPT};
use crate::status_bar::StatusBar;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const WHEEL_LINES: usize = 3;

/// Screen areas from the last frame, used to route mouse events.
#[derive(Debug, Clone, Default)]
pub struct WindowLayout {
    pub menu: Vec<(Command, Rect)>,
    pub editor_text: Rect,
    pub output: Rect,
}

impl WindowLayout {
    fn menu_command_at(&self, column: u16, row: u16) -> Option<Command> {
        self.menu
            .iter()
            .find(|(_, area)| contains(*area, column, row))
            .map(|(command, _)| *command)
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

/// The editor window: document, output pane, status bar and menu, wired to the
/// script runner and the Minecraft probe.
pub struct EditorWindow {
    pub editor: Editor,
    pub output: OutputPane,
    pub status_bar: StatusBar,
    pub config: Config,
    pub highlighter: Highlighter,
    runner: Box<dyn ScriptRunner>,
    probe: Box<dyn MinecraftProbe>,
    running: Option<RunHandle>,
    dialog: Option<FileDialog>,
    show_help: bool,
    should_quit: bool,
    current_path: Option<PathBuf>,
    layout: WindowLayout,
}

impl EditorWindow {
    pub async fn new(
        config: Config,
        runner: Box<dyn ScriptRunner>,
        probe: Box<dyn MinecraftProbe>,
    ) -> Result<Self> {
        let highlighter = Highlighter::new(&config.theme.syntax_theme);
        let mut window = Self {
            editor: Editor::with_indent_width(config.editor.indent_width),
            output: OutputPane::new(),
            status_bar: StatusBar::new(),
            config,
            highlighter,
            runner,
            probe,
            running: None,
            dialog: None,
            show_help: false,
            should_quit: false,
            current_path: None,
            layout: WindowLayout::default(),
        };

        window.load_default_listing().await;
        window.update_line_and_column();
        log::info!("{} started", window.base_title());
        Ok(window)
    }

    async fn load_default_listing(&mut self) {
        if self.probe.is_available().await {
            self.editor.set_content(DEFAULT_MCPI_SCRIPT);
            if self.probe.is_running().await {
                log::debug!("Minecraft-Pi is already running");
            } else {
                log::info!("Starting Minecraft-Pi");
                if let Err(e) = self.probe.start().await {
                    self.status_bar
                        .set_warning(format!("Could not start Minecraft-Pi: {:#}", e));
                }
            }
        } else {
            self.editor.set_content(DEFAULT_SCRIPT);
        }
    }

    pub fn base_title(&self) -> String {
        format!("PyEditor v{}", VERSION)
    }

    pub fn title(&self) -> String {
        let modified = if self.editor.is_modified() { " [+]" } else { "" };
        match &self.current_path {
            Some(path) => format!("{} - {}{}", self.base_title(), path.display(), modified),
            None => format!("{}{}", self.base_title(), modified),
        }
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn dialog(&self) -> Option<&FileDialog> {
        self.dialog.as_ref()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_layout(&mut self, layout: WindowLayout) {
        self.layout = layout;
    }

    pub fn update_line_and_column(&mut self) {
        self.status_bar
            .set_line_and_column(self.editor.cursor_position());
    }

    pub fn update_status(&mut self) {
        self.status_bar.update();
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<()> {
        log::debug!("Command {}", command.label());
        match command {
            Command::Run => self.command_run(),
            Command::Stop => {
                self.command_stop();
                Ok(())
            }
            Command::Load => {
                self.command_load_file().await;
                Ok(())
            }
            Command::Save => {
                self.command_save_file().await;
                Ok(())
            }
            Command::Exit => {
                self.command_exit();
                Ok(())
            }
        }
    }

    pub fn command_run(&mut self) -> Result<()> {
        if self.running.is_some() {
            self.status_bar
                .set_warning("A script is already running, stop it first");
            return Ok(());
        }

        let source = self.editor.get_content();
        self.output.clear();
        let handle = self
            .runner
            .run(&source)
            .context("Failed to run the listing")?;
        self.running = Some(handle);
        self.status_bar.set_info("Running...");
        Ok(())
    }

    pub fn command_stop(&mut self) {
        match self.running.as_mut() {
            Some(handle) => {
                handle.cancel();
                self.status_bar.set_info("Stopping script");
            }
            None => self.status_bar.set_info("No script is running"),
        }
    }

    pub async fn command_load_file(&mut self) {
        self.open_dialog(DialogKind::Open).await;
    }

    pub async fn command_save_file(&mut self) {
        self.open_dialog(DialogKind::Save).await;
    }

    pub fn command_exit(&mut self) {
        if let Some(mut handle) = self.running.take() {
            handle.cancel();
        }
        log::info!("Exit requested");
        self.should_quit = true;
    }

    async fn open_dialog(&mut self, kind: DialogKind) {
        let files = &self.config.files;
        let dialog = FileDialog::open(
            kind,
            files.base_path.clone(),
            files.filetypes.clone(),
            files.default_extension.clone(),
        )
        .await;
        self.dialog = Some(dialog);
    }

    pub async fn load_path(&mut self, path: &Path) -> Result<()> {
        let listing = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.editor.set_content(&listing);
        self.current_path = Some(path.to_path_buf());
        self.update_line_and_column();
        self.status_bar
            .set_success(format!("Loaded {}", path.display()));
        Ok(())
    }

    pub async fn save_path(&mut self, path: &Path) -> Result<()> {
        let listing = self.editor.get_content();
        tokio::fs::write(path, listing.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Saved {} bytes to {}", listing.len(), path.display());
        self.editor.mark_saved();
        self.current_path = Some(path.to_path_buf());
        self.status_bar
            .set_success(format!("Saved {}", path.display()));
        Ok(())
    }

    /// Move pending script output into the output pane. Returns whether anything arrived.
    pub fn poll_script_output(&mut self) -> bool {
        let Some(handle) = self.running.as_mut() else {
            return false;
        };

        let mut received = false;
        while let Some(event) = handle.try_next() {
            received = true;
            match event {
                RunEvent::Output(text) => self.output.append_output(&text),
                RunEvent::Finished { success: true } => {
                    self.status_bar.set_success("Script finished")
                }
                RunEvent::Finished { success: false } => {
                    self.status_bar.set_warning("Script ended with an error")
                }
            }
        }

        if handle.is_finished() {
            self.running = None;
        }
        received
    }

    pub async fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key_event(key).await,
            Event::Mouse(mouse) => self.handle_mouse_event(mouse).await,
            Event::Paste(text) => {
                if self.dialog.is_none() && !self.show_help {
                    self.editor.insert_str(&text);
                    self.update_line_and_column();
                }
                Ok(())
            }
            Event::Resize(width, height) => {
                log::debug!("Terminal resized to {}x{}", width, height);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            self.update_line_and_column();
            return Ok(());
        }

        if self.dialog.is_some() {
            return self.handle_dialog_key(key).await;
        }

        if self.show_help {
            self.show_help = false;
            return Ok(());
        }

        if key.code == KeyCode::F(1) {
            self.show_help = true;
            return Ok(());
        }

        if let Some(command) = Command::from_key(&key) {
            let result = self.dispatch(command).await;
            self.update_line_and_column();
            return result;
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            match key.code {
                KeyCode::Up => self.output.scroll_up(1),
                KeyCode::Down => self.output.scroll_down(1),
                _ => {}
            }
            return Ok(());
        }

        self.handle_editor_key(key);
        self.update_line_and_column();
        Ok(())
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                if self.editor.tab_event() == EventFlow::Continue {
                    self.editor.insert_char('\t');
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.editor.insert_char(c)
            }
            KeyCode::Enter => self.editor.insert_newline(),
            KeyCode::Backspace => self.editor.delete_char_backward(),
            KeyCode::Delete => self.editor.delete_char_forward(),
            KeyCode::Left => self.editor.move_cursor_left(),
            KeyCode::Right => self.editor.move_cursor_right(),
            KeyCode::Up => self.editor.move_cursor_up(),
            KeyCode::Down => self.editor.move_cursor_down(),
            KeyCode::Home => self.editor.move_to_line_start(),
            KeyCode::End => self.editor.move_to_line_end(),
            KeyCode::PageUp => self.editor.page_up(),
            KeyCode::PageDown => self.editor.page_down(),
            _ => {}
        }
    }

    async fn handle_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(dialog) = self.dialog.as_mut() else {
            return Ok(());
        };

        match dialog.handle_key(key) {
            DialogOutcome::Pending => Ok(()),
            DialogOutcome::Cancelled => {
                self.dialog = None;
                self.status_bar.set_info("Cancelled");
                Ok(())
            }
            DialogOutcome::Confirmed(path) => {
                let kind = dialog.kind();
                self.dialog = None;
                match kind {
                    DialogKind::Open => self.load_path(&path).await,
                    DialogKind::Save => self.save_path(&path).await,
                }
            }
        }
    }

    async fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.dialog.is_some() || self.show_help {
            return Ok(());
        }

        let (column, row) = (mouse.column, mouse.row);
        let in_editor = contains(self.layout.editor_text, column, row);
        let in_output = contains(self.layout.output, column, row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(command) = self.layout.menu_command_at(column, row) {
                    return self.dispatch(command).await;
                }
                if in_editor {
                    let text = self.layout.editor_text;
                    self.editor
                        .click_at((row - text.y) as usize, (column - text.x) as usize);
                    self.editor.focus();
                }
            }
            MouseEventKind::Up(_) if in_editor => self.update_line_and_column(),
            MouseEventKind::ScrollUp if in_output => self.output.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown if in_output => self.output.scroll_down(WHEEL_LINES),
            MouseEventKind::ScrollUp if in_editor => {
                for _ in 0..WHEEL_LINES {
                    self.editor.move_cursor_up();
                }
                self.update_line_and_column();
            }
            MouseEventKind::ScrollDown if in_editor => {
                for _ in 0..WHEEL_LINES {
                    self.editor.move_cursor_down();
                }
                self.update_line_and_column();
            }
            _ => {}
        }
        Ok(())
    }
}

impl Drop for EditorWindow {
    fn drop(&mut self) {
        if let Some(mut handle) = self.running.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crossterm::event::KeyEventState;
    use pyexec::RunSender;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct FakeProbe {
        available: bool,
        running: bool,
        fail_start: bool,
        starts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MinecraftProbe for FakeProbe {
        async fn is_available(&self) -> bool {
            self.available
        }

        async fn is_running(&self) -> bool {
            self.running
        }

        async fn start(&self) -> Result<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            if self.fail_start {
                anyhow::bail!("no display");
            }
            Ok(())
        }
    }

    /// Echoes a fixed output. With `hold` set the run stays in flight.
    #[derive(Default)]
    struct FakeRunner {
        output: Vec<String>,
        hold: bool,
        fail: bool,
        runs: Arc<AtomicUsize>,
        sources: Arc<Mutex<Vec<String>>>,
        held: Mutex<Vec<RunSender>>,
    }

    impl ScriptRunner for FakeRunner {
        fn run(&self, source: &str) -> Result<RunHandle> {
            if self.fail {
                anyhow::bail!("interpreter missing");
            }
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.sources.lock().unwrap().push(source.to_string());
            let (sender, handle) = pyexec::channel();
            for text in &self.output {
                sender.output(text.clone());
            }
            if self.hold {
                self.held.lock().unwrap().push(sender);
            } else {
                sender.finish(true);
            }
            Ok(handle)
        }
    }

    fn unavailable() -> Box<dyn MinecraftProbe> {
        Box::new(FakeProbe {
            available: false,
            running: false,
            fail_start: false,
            starts: Arc::new(AtomicUsize::new(0)),
        })
    }

    async fn window_with(runner: FakeRunner, dir: &TempDir) -> EditorWindow {
        let mut config = Config::default();
        config.files.base_path = dir.path().to_path_buf();
        EditorWindow::new(config, Box::new(runner), unavailable())
            .await
            .unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    async fn type_text(window: &mut EditorWindow, text: &str) {
        for c in text.chars() {
            window.handle_event(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_startup_without_minecraft() {
        let starts = Arc::new(AtomicUsize::new(0));
        let probe = FakeProbe {
            available: false,
            running: false,
            fail_start: false,
            starts: starts.clone(),
        };
        let window = EditorWindow::new(
            Config::default(),
            Box::new(FakeRunner::default()),
            Box::new(probe),
        )
        .await
        .unwrap();

        assert_eq!(window.editor.get_content(), DEFAULT_SCRIPT.trim());
        assert_eq!(starts.load(Ordering::SeqCst), 0);
        assert_eq!(window.status_bar.label("line"), Some("Line: 1"));
        assert_eq!(window.status_bar.label("column"), Some("Column: 0"));
        assert!(window.editor.has_focus());
        assert_eq!(window.title(), format!("PyEditor v{}", VERSION));
    }

    #[tokio::test]
    async fn test_startup_starts_minecraft_once() {
        let starts = Arc::new(AtomicUsize::new(0));
        let probe = FakeProbe {
            available: true,
            running: false,
            fail_start: false,
            starts: starts.clone(),
        };
        let window = EditorWindow::new(
            Config::default(),
            Box::new(FakeRunner::default()),
            Box::new(probe),
        )
        .await
        .unwrap();

        assert_eq!(window.editor.get_content(), DEFAULT_MCPI_SCRIPT.trim());
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_startup_with_running_minecraft() {
        let starts = Arc::new(AtomicUsize::new(0));
        let probe = FakeProbe {
            available: true,
            running: true,
            fail_start: false,
            starts: starts.clone(),
        };
        let window = EditorWindow::new(
            Config::default(),
            Box::new(FakeRunner::default()),
            Box::new(probe),
        )
        .await
        .unwrap();

        assert_eq!(window.editor.get_content(), DEFAULT_MCPI_SCRIPT.trim());
        assert_eq!(starts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_start_failure_is_a_warning() {
        let starts = Arc::new(AtomicUsize::new(0));
        let probe = FakeProbe {
            available: true,
            running: false,
            fail_start: true,
            starts: starts.clone(),
        };
        let window = EditorWindow::new(
            Config::default(),
            Box::new(FakeRunner::default()),
            Box::new(probe),
        )
        .await
        .unwrap();

        assert_eq!(starts.load(Ordering::SeqCst), 1);
        let message = window.status_bar.current_message().unwrap();
        assert_eq!(message.message_type, crate::status_bar::MessageType::Warning);
        assert!(message.content.contains("no display"));
        assert_eq!(window.editor.get_content(), DEFAULT_MCPI_SCRIPT.trim());
    }

    #[tokio::test]
    async fn test_disabled_probe_loads_default_script() {
        let window = EditorWindow::new(
            Config::default(),
            Box::new(FakeRunner::default()),
            Box::new(mcpi::Unavailable),
        )
        .await
        .unwrap();
        assert!(window.status_bar.current_message().is_none());
        assert_eq!(window.editor.get_content(), DEFAULT_SCRIPT.trim());
    }

    #[tokio::test]
    async fn test_run_streams_output_into_read_only_pane() {
        let dir = TempDir::new().unwrap();
        let sources = Arc::new(Mutex::new(Vec::new()));
        let runner = FakeRunner {
            output: vec!["hello\n".to_string(), "world\n".to_string()],
            sources: sources.clone(),
            ..Default::default()
        };
        let mut window = window_with(runner, &dir).await;
        window.editor.set_content("print('hello')\n\n");
        window.output.append_output("previous run\n");

        window.handle_event(key(KeyCode::F(5))).await.unwrap();
        assert!(window.is_running());
        assert_eq!(window.output.content(), "");

        assert!(window.poll_script_output());
        assert_eq!(window.output.content(), "hello\nworld\n");
        assert!(!window.output.is_writable());
        assert!(!window.is_running());
        assert_eq!(sources.lock().unwrap().as_slice(), ["print('hello')"]);
        assert!(!window.poll_script_output());
    }

    #[tokio::test]
    async fn test_second_run_is_refused() {
        let dir = TempDir::new().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));
        let runner = FakeRunner {
            hold: true,
            runs: runs.clone(),
            ..Default::default()
        };
        let mut window = window_with(runner, &dir).await;

        window.handle_event(ctrl('r')).await.unwrap();
        window.handle_event(ctrl('r')).await.unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(window
            .status_bar
            .current_message()
            .unwrap()
            .content
            .contains("already running"));

        window.dispatch(Command::Stop).await.unwrap();
        assert!(window.is_running());
        assert_eq!(
            window.status_bar.current_message().unwrap().content,
            "Stopping script"
        );
    }

    #[tokio::test]
    async fn test_runner_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner {
            fail: true,
            ..Default::default()
        };
        let mut window = window_with(runner, &dir).await;
        let result = window.dispatch(Command::Run).await;
        assert!(result.is_err());
        assert!(!window.is_running());
        assert_eq!(window.output.content(), "");
    }

    #[tokio::test]
    async fn test_cancelled_load_keeps_content() {
        let dir = TempDir::new().unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;
        let before = window.editor.get_content();

        window.handle_event(key(KeyCode::F(2))).await.unwrap();
        assert_eq!(window.dialog().unwrap().kind(), DialogKind::Open);
        type_text(&mut window, "ignored.py").await;
        window.handle_event(key(KeyCode::Esc)).await.unwrap();

        assert!(window.dialog().is_none());
        assert_eq!(window.editor.get_content(), before);
        assert_eq!(window.status_bar.current_message().unwrap().content, "Cancelled");
    }

    #[tokio::test]
    async fn test_load_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.py");
        std::fs::write(&path, "print('hello')\n").unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;

        window.handle_event(ctrl('o')).await.unwrap();
        type_text(&mut window, "hello.py").await;
        window.handle_event(key(KeyCode::Enter)).await.unwrap();

        assert!(window.dialog().is_none());
        assert_eq!(window.editor.get_content(), "print('hello')");
        assert_eq!(window.editor.cursor(), (0, 0));
        assert_eq!(window.current_path(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_load_crlf_file_saves_with_lf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dos.py");
        std::fs::write(&path, "a = 1\r\nprint(a)\r\n").unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;

        window.load_path(&path).await.unwrap();
        assert_eq!(window.editor.get_content(), "a = 1\nprint(a)");

        let out = dir.path().join("unix.py");
        window.save_path(&out).await.unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a = 1\nprint(a)");
    }

    #[tokio::test]
    async fn test_load_error_keeps_content() {
        let dir = TempDir::new().unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;
        let before = window.editor.get_content();

        let result = window.load_path(&dir.path().join("missing.py")).await;
        assert!(result.is_err());
        assert_eq!(window.editor.get_content(), before);
        assert_eq!(window.current_path(), None);
    }

    #[tokio::test]
    async fn test_save_writes_stripped_listing() {
        let dir = TempDir::new().unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;
        window.editor.set_content("\n  x = 1\n\n");

        window.handle_event(key(KeyCode::F(3))).await.unwrap();
        assert_eq!(window.dialog().unwrap().kind(), DialogKind::Save);
        type_text(&mut window, "out").await;
        window.handle_event(key(KeyCode::Enter)).await.unwrap();

        let saved = std::fs::read_to_string(dir.path().join("out.py")).unwrap();
        assert_eq!(saved, "x = 1");
        assert!(!window.editor.is_modified());
    }

    #[tokio::test]
    async fn test_exit() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner {
            hold: true,
            ..Default::default()
        };
        let mut window = window_with(runner, &dir).await;
        window.dispatch(Command::Run).await.unwrap();

        window.handle_event(ctrl('q')).await.unwrap();
        assert!(window.should_quit());
        assert!(!window.is_running());
    }

    #[tokio::test]
    async fn test_tab_inserts_spaces() {
        let dir = TempDir::new().unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;
        window.editor.set_content("a\nb");

        window.handle_event(key(KeyCode::Down)).await.unwrap();
        window.handle_event(key(KeyCode::Tab)).await.unwrap();

        assert_eq!(window.editor.get_content(), "a\n    b");
        assert!(!window.editor.get_content().contains('\t'));
        assert_eq!(window.status_bar.label("line"), Some("Line: 2"));
        assert_eq!(window.status_bar.label("column"), Some("Column: 4"));
    }

    #[tokio::test]
    async fn test_key_release_only_updates_status() {
        let dir = TempDir::new().unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;
        window.editor.set_content("abc");
        window.editor.set_cursor_position(0, 2);

        let release = KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        window.handle_event(Event::Key(release)).await.unwrap();

        assert_eq!(window.editor.get_content(), "abc");
        assert_eq!(window.status_bar.label("column"), Some("Column: 2"));
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let dir = TempDir::new().unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;
        let before = window.editor.get_content();

        window.handle_event(key(KeyCode::F(1))).await.unwrap();
        assert!(window.show_help());
        window.handle_event(key(KeyCode::Char('z'))).await.unwrap();
        assert!(!window.show_help());
        assert_eq!(window.editor.get_content(), before);
    }

    #[tokio::test]
    async fn test_paste_inserts_text() {
        let dir = TempDir::new().unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;
        window.editor.set_content("");

        window
            .handle_event(Event::Paste("x = 1\r\ny = 2".to_string()))
            .await
            .unwrap();
        assert_eq!(window.editor.get_content(), "x = 1\ny = 2");
        assert_eq!(window.status_bar.label("line"), Some("Line: 2"));
    }

    #[tokio::test]
    async fn test_menu_click_dispatches() {
        let dir = TempDir::new().unwrap();
        let mut window = window_with(FakeRunner::default(), &dir).await;
        window.set_layout(WindowLayout {
            menu: vec![(Command::Exit, Rect::new(10, 0, 6, 1))],
            editor_text: Rect::new(5, 2, 40, 10),
            output: Rect::new(0, 14, 50, 5),
        });

        let click = |column, row| {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            })
        };

        window.editor.set_content("first\nsecond line");
        window.handle_event(click(8, 3)).await.unwrap();
        assert_eq!(window.editor.cursor(), (1, 3));

        window.handle_event(click(12, 0)).await.unwrap();
        assert!(window.should_quit());
    }
}
