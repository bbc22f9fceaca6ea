use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

pub const FALLBACK_THEME: &str = "base16-ocean.dark";

/// Python syntax colouring for the editor view.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();

        let theme = match theme_set.themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                log::warn!("Unknown syntax theme '{}', using {}", theme_name, FALLBACK_THEME);
                theme_set.themes.remove(FALLBACK_THEME).unwrap_or_default()
            }
        };

        Self { syntax_set, theme }
    }

    fn python(&self) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_extension("py")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Highlight a run of consecutive lines. Parser state carries from one line to the next,
    /// so multi-line strings that start inside the run are coloured correctly.
    pub fn highlight_lines(&self, lines: &[String]) -> Vec<Line<'static>> {
        let mut highlighter = HighlightLines::new(self.python(), &self.theme);
        lines
            .iter()
            .map(|line| {
                // the newline-aware syntaxes expect a terminated line
                let terminated = format!("{}\n", line);
                let regions = highlighter
                    .highlight_line(&terminated, &self.syntax_set)
                    .unwrap_or_else(|_| vec![(SynStyle::default(), terminated.as_str())]);

                let spans: Vec<Span<'static>> = regions
                    .into_iter()
                    .map(|(style, text)| (style, text.trim_end_matches('\n')))
                    .filter(|(_, text)| !text.is_empty())
                    .map(|(style, text)| Span::styled(text.to_string(), syn_style_to_ratatui(style)))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn syn_style_to_ratatui(style: SynStyle) -> Style {
    let fg = style.foreground;
    Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b))
}
