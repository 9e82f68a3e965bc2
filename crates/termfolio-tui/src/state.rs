//! Application state for the TUI.
//!
//! ```text
//! AppState
//! ├── session: Session   (transcript, history, input, phase)
//! ├── theme: Theme
//! ├── scroll_offset      (rows above the bottom of the transcript)
//! ├── viewport           (last terminal size)
//! └── frame_count        (caret blink)
//! ```

use termfolio_core::session::Session;

use crate::theme::Theme;

/// Ticks per caret blink phase.
const CARET_BLINK_TICKS: usize = 8;

/// Rows taken by the input line and the status line.
const CHROME_HEIGHT: u16 = 2;

pub struct AppState {
    pub session: Session,
    pub theme: Theme,
    /// Rows scrolled up from the bottom; 0 follows new output.
    pub scroll_offset: usize,
    pub viewport: (u16, u16),
    pub frame_count: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(session: Session, theme: Theme) -> Self {
        Self {
            session,
            theme,
            scroll_offset: 0,
            viewport: (0, 0),
            frame_count: 0,
            should_quit: false,
        }
    }

    /// Rows moved by one PageUp/PageDown.
    pub fn page_size(&self) -> usize {
        usize::from(self.viewport.1.saturating_sub(CHROME_HEIGHT)).max(1)
    }

    pub fn follow_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn caret_visible(&self) -> bool {
        (self.frame_count / CARET_BLINK_TICKS).is_multiple_of(2)
    }
}
