use std::time::{Duration, Instant};

use crate::editor::CursorPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub auto_clear_duration: Option<Duration>,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: Some(Self::default_duration_for_type(message_type)),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.auto_clear_duration
            .map(|duration| self.created_at.elapsed() > duration)
            .unwrap_or(false)
    }

    fn default_duration_for_type(message_type: MessageType) -> Duration {
        match message_type {
            MessageType::Info => Duration::from_secs(3),
            MessageType::Success => Duration::from_secs(2),
            MessageType::Warning => Duration::from_secs(5),
            MessageType::Error => Duration::from_secs(7),
        }
    }
}

/// Row of named labels plus one transient message.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    labels: Vec<(String, String)>,
    message: Option<StatusMessage>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a label. New labels are appended after the existing ones.
    pub fn set_label(&mut self, name: &str, text: impl Into<String>) {
        let text = text.into();
        match self.labels.iter_mut().find(|(label, _)| label == name) {
            Some((_, current)) => *current = text,
            None => self.labels.push((name.to_string(), text)),
        }
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(label, _)| label == name)
            .map(|(_, text)| text.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|(_, text)| text.as_str())
    }

    pub fn set_line_and_column(&mut self, position: CursorPosition) {
        self.set_label("line", format!("Line: {}", position.line));
        self.set_label("column", format!("Column: {}", position.column));
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set_message(message.into(), MessageType::Info);
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.set_message(message.into(), MessageType::Success);
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.set_message(message.into(), MessageType::Warning);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set_message(message.into(), MessageType::Error);
    }

    fn set_message(&mut self, content: String, message_type: MessageType) {
        match message_type {
            MessageType::Error => log::error!("{}", content),
            MessageType::Warning => log::warn!("{}", content),
            _ => log::debug!("{}", content),
        }
        self.message = Some(StatusMessage::new(content, message_type));
    }

    pub fn current_message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Drop the message once it has been shown long enough.
    pub fn update(&mut self) {
        if self.message.as_ref().is_some_and(StatusMessage::is_expired) {
            self.message = None;
        }
    }
}
