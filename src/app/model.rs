//! Application model types: `App`, `InputMode` and `Notice`.

use std::time::{Duration, Instant};

/// How long a notice stays on the status line.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// What keystrokes currently feed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Admin password prompt; input is masked.
    Password,
    /// Path of an audio file to upload.
    FilePath,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub at: Instant,
}

/// The UI-side application model.
pub struct App {
    /// Cursor in the track list (not necessarily the current track).
    pub selected: usize,
    pub mode: InputMode,
    pub input: String,
    pub notice: Option<Notice>,
    started: Instant,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            selected: 0,
            mode: InputMode::Normal,
            input: String::new(),
            notice: None,
            started: Instant::now(),
        }
    }

    /// Time since startup; drives the idle visualizer.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Move the cursor down, wrapping within `len` tracks.
    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping within `len` tracks.
    pub fn prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Keep the cursor inside a list that may have shrunk.
    pub fn clamp_selection(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn open_prompt(&mut self, mode: InputMode) {
        self.mode = mode;
        self.input.clear();
    }

    pub fn close_prompt(&mut self) {
        self.mode = InputMode::Normal;
        self.input.clear();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Close the prompt and hand back what was typed.
    pub fn take_input(&mut self) -> String {
        self.mode = InputMode::Normal;
        std::mem::take(&mut self.input)
    }

    /// Keep `mode`'s prompt open with an empty field and show `text`.
    pub fn retry_prompt(&mut self, mode: InputMode, text: impl Into<String>) {
        self.open_prompt(mode);
        self.error(text);
    }

    /// Prompt contents as they should be shown.
    pub fn visible_input(&self) -> String {
        match self.mode {
            InputMode::Password => "*".repeat(self.input.chars().count()),
            _ => self.input.clone(),
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            kind: NoticeKind::Info,
            at: Instant::now(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            kind: NoticeKind::Error,
            at: Instant::now(),
        });
    }

    /// The notice, unless it has expired by `now`.
    pub fn active_notice(&self, now: Instant) -> Option<&Notice> {
        self.notice
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.at) < NOTICE_TTL)
    }
}
