//! Application state for the ecoprompt TUI.

use crate::core::events::Event;
use crate::core::state::{self, RequestState};

/// Spinner frames shown while a request is in flight.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const MAX_PROMPT_CHARS: usize = 16_000;

// === Input Helpers ===

fn byte_index_at_char(text: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    text.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

fn remove_char_at(text: &mut String, char_index: usize) -> bool {
    let start = byte_index_at_char(text, char_index);
    if start >= text.len() {
        return false;
    }
    let ch = text[start..].chars().next().unwrap();
    let end = start + ch.len_utf8();
    text.replace_range(start..end, "");
    true
}

// === Types ===

/// TUI state: the prompt composer plus the folded request state.
pub struct App {
    /// Prompt text being edited.
    pub input: String,
    /// Cursor position in chars.
    pub cursor: usize,
    /// Request state folded from the engine's event stream.
    pub request: RequestState,
    /// Endpoint shown in the header.
    pub endpoint_url: String,
    /// Total attempts per submission, for the loading indicator.
    pub max_attempts: u32,
    /// Advances once per tick while Loading.
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(endpoint_url: String, max_attempts: u32) -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            request: RequestState::Idle,
            endpoint_url,
            max_attempts,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// Fold one engine event into the local request-state copy.
    pub fn apply_event(&mut self, event: &Event) {
        self.request = state::advance(std::mem::take(&mut self.request), event);
    }

    /// Submit is available whenever no request is in flight.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.request.is_loading()
    }

    pub fn tick(&mut self) {
        if self.request.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    #[must_use]
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    // === Composer Editing ===

    pub fn insert_char(&mut self, ch: char) {
        if self.input.chars().count() >= MAX_PROMPT_CHARS {
            return;
        }
        let at = byte_index_at_char(&self.input, self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        if remove_char_at(&mut self.input, self.cursor - 1) {
            self.cursor -= 1;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }
}
