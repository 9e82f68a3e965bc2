//! Transcript lines.
//!
//! A `Line` pairs an immutable final content with the prefix of it that has
//! been revealed so far. Only the reveal engine grows the revealed prefix;
//! the session replaces lines wholesale on `clear`.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::segment::FormattedOutput;

static LINE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique line identifier. Ids increase in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

impl LineId {
    pub fn new() -> Self {
        LineId(LINE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

/// What a line represents in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Echo of the submitted command (never animated).
    CommandEcho,
    Output,
    Error,
    Info,
    Welcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    id: LineId,
    kind: LineKind,
    final_content: FormattedOutput,
    revealed: FormattedOutput,
    complete: bool,
}

impl Line {
    /// Creates a fully revealed line.
    pub fn revealed(kind: LineKind, content: FormattedOutput) -> Self {
        Self {
            id: LineId::new(),
            kind,
            revealed: content.clone(),
            final_content: content,
            complete: true,
        }
    }

    /// Creates a line with nothing revealed yet.
    ///
    /// A line whose content has no segments at all is complete from the start.
    pub fn pending(kind: LineKind, content: FormattedOutput) -> Self {
        let complete = content.is_empty();
        Self {
            id: LineId::new(),
            kind,
            final_content: content,
            revealed: FormattedOutput::new(),
            complete,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn final_content(&self) -> &FormattedOutput {
        &self.final_content
    }

    pub fn revealed_content(&self) -> &FormattedOutput {
        &self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Split borrow used by the reveal engine.
    pub(crate) fn reveal_parts(&mut self) -> (&FormattedOutput, &mut FormattedOutput) {
        (&self.final_content, &mut self.revealed)
    }

    pub(crate) fn mark_complete(&mut self) {
        debug_assert_eq!(self.revealed, self.final_content);
        self.complete = true;
    }

    /// Reveals everything at once.
    pub(crate) fn snap_to_complete(&mut self) {
        if !self.complete {
            self.revealed = self.final_content.clone();
            self.complete = true;
        }
    }
}
