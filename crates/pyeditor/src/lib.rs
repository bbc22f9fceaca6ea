// PyEditor library exports

pub mod commands;
pub mod config;
pub mod editor;
pub mod file_dialog;
pub mod highlight;
pub mod output_pane;
pub mod scripts;
pub mod status_bar;
pub mod tui;
pub mod ui;
pub mod window;

pub use commands::{Command, MENU};
pub use config::Config;
pub use editor::{CursorPosition, Editor, EventFlow};
pub use output_pane::OutputPane;
pub use status_bar::StatusBar;
pub use window::EditorWindow;
