/// Read-only text area that receives the output of script runs.
///
/// The pane only becomes writable for the duration of [`OutputPane::append_output`]
/// and [`OutputPane::clear`]; user input never reaches it.
#[derive(Debug, Clone)]
pub struct OutputPane {
    text: String,
    writable: bool,
    scroll: usize,
    follow: bool,
    height: usize,
}

impl OutputPane {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            writable: false,
            scroll: 0,
            follow: true,
            height: 10,
        }
    }

    pub fn append_output(&mut self, text: &str) {
        self.writable = true;
        self.insert_end(text);
        self.writable = false;
    }

    pub fn clear(&mut self) {
        self.writable = true;
        self.text.clear();
        self.scroll = 0;
        self.follow = true;
        self.writable = false;
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn content(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.height = height.max(1);
        if self.follow {
            self.scroll = self.max_scroll();
        } else {
            self.scroll = self.scroll.min(self.max_scroll());
        }
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow = self.scroll >= self.max_scroll();
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll());
        self.follow = self.scroll >= self.max_scroll();
    }

    /// Lines currently inside the viewport.
    pub fn visible_lines(&self) -> Vec<&str> {
        self.text.split('\n').skip(self.scroll).take(self.height).collect()
    }

    fn insert_end(&mut self, text: &str) {
        if !self.writable {
            log::warn!("Dropped {} bytes sent to read-only output pane", text.len());
            return;
        }
        self.text.extend(text.chars().filter(|&c| c != '\r'));
        if self.follow {
            self.scroll = self.max_scroll();
        }
    }

    fn max_scroll(&self) -> usize {
        self.line_count().saturating_sub(self.height)
    }
}

impl Default for OutputPane {
    fn default() -> Self {
        Self::new()
    }
}
