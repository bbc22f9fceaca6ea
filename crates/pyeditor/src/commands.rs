use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// User commands reachable from the menu bar and keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Run,
    Stop,
    Load,
    Save,
    Exit,
}

/// One menu bar item and the keys bound to it.
#[derive(Debug, Clone, Copy)]
pub struct MenuEntry {
    pub command: Command,
    pub label: &'static str,
    pub function_key: u8,
    pub control: char,
}

impl MenuEntry {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::F(n) => n == self.function_key && key.modifiers.is_empty(),
            KeyCode::Char(c) => {
                key.modifiers == KeyModifiers::CONTROL && c.to_ascii_lowercase() == self.control
            }
            _ => false,
        }
    }

    pub fn shortcut(&self) -> String {
        format!("F{} / Ctrl+{}", self.function_key, self.control.to_ascii_uppercase())
    }
}

/// Menu bar contents, in display order.
pub const MENU: [MenuEntry; 5] = [
    MenuEntry {
        command: Command::Run,
        label: "Run",
        function_key: 5,
        control: 'r',
    },
    MenuEntry {
        command: Command::Stop,
        label: "Stop",
        function_key: 6,
        control: 'c',
    },
    MenuEntry {
        command: Command::Load,
        label: "Load",
        function_key: 2,
        control: 'o',
    },
    MenuEntry {
        command: Command::Save,
        label: "Save",
        function_key: 3,
        control: 's',
    },
    MenuEntry {
        command: Command::Exit,
        label: "Exit",
        function_key: 10,
        control: 'q',
    },
];

impl Command {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        MENU.iter()
            .find(|entry| entry.matches(key))
            .map(|entry| entry.command)
    }

    pub fn entry(self) -> &'static MenuEntry {
        MENU.iter()
            .find(|entry| entry.command == self)
            .unwrap_or(&MENU[0])
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }
}
