use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::commands::{Command, MENU};
use crate::file_dialog::FileDialog;
use crate::status_bar::MessageType;
use crate::window::{EditorWindow, WindowLayout};

const CURRENT_LINE_BG: Color = Color::Rgb(43, 48, 59);

pub fn draw(f: &mut Frame, window: &mut EditorWindow) {
    let area = f.size();
    let output_height = window.config.editor.output_height + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Menu bar
            Constraint::Min(3),                // Editor
            Constraint::Length(output_height), // Output pane
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    let menu = draw_menu_bar(f, window, chunks[0]);
    let editor_text = draw_editor(f, window, chunks[1]);
    draw_output(f, window, chunks[2]);
    draw_status_bar(f, window, chunks[3]);

    window.set_layout(WindowLayout {
        menu,
        editor_text,
        output: chunks[2],
    });

    if let Some(dialog) = window.dialog() {
        draw_dialog(f, dialog, area);
    } else if window.show_help() {
        draw_help(f, area);
    }
}

fn draw_menu_bar(
    f: &mut Frame,
    window: &EditorWindow,
    area: Rect,
) -> Vec<(Command, Rect)> {
    let bar_style = Style::default().bg(Color::Blue).fg(Color::White);
    f.render_widget(Block::default().style(bar_style), area);

    let mut items = Vec::new();
    let mut x = area.x;
    for entry in MENU.iter() {
        let text = format!(" {} F{} ", entry.label, entry.function_key);
        let width = text.width() as u16;
        if x >= area.right() {
            break;
        }
        let item = Rect::new(x, area.y, width.min(area.right() - x), 1);

        let dimmed = match entry.command {
            Command::Run => window.is_running(),
            Command::Stop => !window.is_running(),
            _ => false,
        };
        let label_style = if dimmed {
            bar_style.fg(Color::Gray)
        } else {
            bar_style.add_modifier(Modifier::BOLD)
        };
        let spans = vec![
            Span::styled(format!(" {}", entry.label), label_style),
            Span::styled(format!(" F{} ", entry.function_key), bar_style.fg(Color::Cyan)),
        ];
        f.render_widget(Paragraph::new(Line::from(spans)), item);

        items.push((entry.command, item));
        x = x.saturating_add(width + 1);
    }

    if x < area.right() {
        let help = Rect::new(x, area.y, area.right() - x, 1);
        let spans = vec![
            Span::styled(" Help", bar_style),
            Span::styled(" F1", bar_style.fg(Color::Cyan)),
        ];
        f.render_widget(Paragraph::new(Line::from(spans)), help);
    }

    items
}

/// Draw the document and return the area holding its text.
fn draw_editor(f: &mut Frame, window: &mut EditorWindow, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", window.title()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let gutter_width = if window.config.editor.line_numbers {
        window.editor.line_count().to_string().len().max(3) as u16 + 1
    } else {
        0
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(gutter_width), Constraint::Min(0)])
        .split(inner);
    let text_area = columns[1];

    window.editor.set_viewport_height(text_area.height as usize);
    let lines = window.editor.viewport_lines();
    let offset = window.editor.viewport_offset();
    let (cursor_line, _) = window.editor.cursor();

    if gutter_width > 0 {
        let numbers: Vec<Line> = (0..lines.len())
            .map(|i| {
                let style = if offset + i == cursor_line {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::styled(
                    format!("{:>width$} ", offset + i + 1, width = gutter_width as usize - 1),
                    style,
                )
            })
            .collect();
        f.render_widget(Paragraph::new(numbers), columns[0]);
    }

    let cursor_row = cursor_line.saturating_sub(offset) as u16;
    if window.config.editor.highlight_current_line && cursor_row < text_area.height {
        let row = Rect::new(text_area.x, text_area.y + cursor_row, text_area.width, 1);
        f.render_widget(Block::default().style(Style::default().bg(CURRENT_LINE_BG)), row);
    }

    let highlighted = window.highlighter.highlight_lines(&lines);
    f.render_widget(Paragraph::new(highlighted), text_area);

    let has_overlay = window.dialog().is_some() || window.show_help();
    if window.editor.has_focus() && !has_overlay && cursor_row < text_area.height {
        let col = u16::try_from(window.editor.cursor_display_col()).unwrap_or(u16::MAX);
        let x = text_area.x.saturating_add(col);
        if x < text_area.right() {
            f.set_cursor(x, text_area.y + cursor_row);
        }
    }

    text_area
}

fn draw_output(f: &mut Frame, window: &mut EditorWindow, area: Rect) {
    let title = if window.is_running() {
        " Output [running] "
    } else {
        " Output "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    window.output.set_viewport_height(inner.height as usize);
    let lines: Vec<Line> = window
        .output
        .visible_lines()
        .into_iter()
        .map(|line| Line::from(line.to_string()))
        .collect();
    f.render_widget(
        Paragraph::new(lines).style(Style::default().fg(Color::White)),
        inner,
    );
}

fn draw_status_bar(f: &mut Frame, window: &EditorWindow, area: Rect) {
    let bar_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let mut spans: Vec<Span> = window
        .status_bar
        .labels()
        .map(|label| Span::styled(format!(" {} ", label), bar_style))
        .collect();

    if let Some(message) = window.status_bar.current_message() {
        let color = match message.message_type {
            MessageType::Info => Color::Cyan,
            MessageType::Success => Color::Green,
            MessageType::Warning => Color::Yellow,
            MessageType::Error => Color::Red,
        };
        spans.push(Span::styled(
            format!("  {}", message.content),
            bar_style.fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), area);
}

fn draw_dialog(f: &mut Frame, dialog: &FileDialog, area: Rect) {
    let popup = centered_rect(70, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", dialog.title()));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Directory
            Constraint::Length(1), // Filter
            Constraint::Length(1), // Name input
            Constraint::Min(0),    // Entries
            Constraint::Length(1), // Key hints
        ])
        .split(inner);

    let label = Style::default().fg(Color::DarkGray);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Directory: ", label),
            Span::raw(dialog.directory().display().to_string()),
        ])),
        rows[0],
    );

    let filter = dialog
        .active_filter()
        .map(|filetype| format!("{} ({})", filetype.label, filetype.patterns.join(" ")))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Filter:    ", label),
            Span::raw(filter),
        ])),
        rows[1],
    );

    let prompt = "Name:      ";
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(prompt, label),
            Span::styled(dialog.input().to_string(), Style::default().fg(Color::Yellow)),
        ])),
        rows[2],
    );
    let cursor_x = rows[2].x + (prompt.width() + dialog.input().width()) as u16;
    if cursor_x < rows[2].right() {
        f.set_cursor(cursor_x, rows[2].y);
    }

    let visible = rows[3].height as usize;
    let first = match dialog.selected() {
        Some(selected) if visible > 0 && selected >= visible => selected + 1 - visible,
        _ => 0,
    };
    let entries: Vec<Line> = dialog
        .entries()
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, name)| {
            if Some(i) == dialog.selected() {
                Line::styled(
                    format!("> {}", name),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                )
            } else {
                Line::from(format!("  {}", name))
            }
        })
        .collect();
    f.render_widget(Paragraph::new(entries), rows[3]);

    f.render_widget(
        Paragraph::new("Enter confirm  Esc cancel  Up/Down select  Ctrl+F filter").style(label),
        rows[4],
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(""),
        Line::styled(" Commands", Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
    ];
    for entry in MENU.iter() {
        lines.push(Line::from(format!("  {:<16} {}", entry.shortcut(), entry.label)));
    }
    lines.extend([
        Line::from(""),
        Line::styled(" Editing", Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  Tab              Indent with spaces"),
        Line::from("  Alt+Up/Down      Scroll output"),
        Line::from("  Mouse wheel      Scroll output or move cursor"),
        Line::from("  F1               Toggle this help"),
        Line::from(""),
        Line::styled(
            " Press any key to close",
            Style::default().add_modifier(Modifier::ITALIC),
        ),
    ]);

    let help = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Blue)),
        );
    f.render_widget(help, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
