//! Incremental renderer (typing engine).
//!
//! Reveals a line's final content one code point per tick, walking segments
//! in order. Each tick is a plain function of the line, so the cadence is the
//! caller's business: the TUI drives it from a clock, tests drive it in a
//! loop.
//!
//! ## Ordering
//!
//! The revealed content is always a prefix of the final content: segment
//! index ascending, then character index within the open segment ascending.
//! Crossing into a new source segment opens an empty revealed segment that
//! inherits the source's color, weight and link before the character lands.

use std::collections::VecDeque;

use crate::line::{Line, LineId, LineKind};
use crate::segment::FormattedOutput;

/// Advances `line` by one tick in place.
///
/// Appends exactly one character to the open segment, opening segments
/// (including empty ones) as needed. Returns false if the line was already
/// complete.
pub fn advance(line: &mut Line) -> bool {
    if line.is_complete() {
        return false;
    }

    let done = {
        let (target, revealed) = line.reveal_parts();
        let source = target.segments();
        let open = revealed.segments_mut();

        if open.is_empty() {
            match source.first() {
                Some(first) => open.push(first.empty_like()),
                None => return false,
            }
        }

        // Append one character, moving past exhausted segments.
        loop {
            let idx = open.len() - 1;
            let consumed = open[idx].text.len();
            if let Some(ch) = source[idx].text[consumed..].chars().next() {
                open[idx].text.push(ch);
                break;
            }
            match source.get(idx + 1) {
                Some(next) => open.push(next.empty_like()),
                None => break,
            }
        }

        // Open trailing empty segments so the tick that lands the last
        // character is also the one that completes the line.
        loop {
            let idx = open.len() - 1;
            if open[idx].text.len() < source[idx].text.len() {
                break;
            }
            match source.get(idx + 1) {
                Some(next) if next.text.is_empty() => open.push(next.empty_like()),
                _ => break,
            }
        }

        let idx = open.len() - 1;
        open.len() == source.len() && open[idx].text.len() == source[idx].text.len()
    };

    if done {
        line.mark_complete();
    }
    true
}

/// Returns the state of `line` after one tick.
pub fn step(line: &Line) -> Line {
    let mut next = line.clone();
    advance(&mut next);
    next
}

/// The reveal in progress: which line is animating and what follows it.
///
/// Plain multi-line output is split into several lines up front; all but the
/// first wait here and are appended one at a time as their predecessor
/// completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealJob {
    active: LineId,
    kind: LineKind,
    queued: VecDeque<FormattedOutput>,
}

impl RevealJob {
    pub fn new(
        active: LineId,
        kind: LineKind,
        queued: impl IntoIterator<Item = FormattedOutput>,
    ) -> Self {
        Self {
            active,
            kind,
            queued: queued.into_iter().collect(),
        }
    }

    /// Id of the line currently being revealed.
    pub fn active(&self) -> LineId {
        self.active
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Number of lines still waiting behind the active one.
    pub fn remaining(&self) -> usize {
        self.queued.len()
    }

    /// Pops the next queued content as a fresh pending line and makes it the
    /// active one.
    pub fn next_line(&mut self) -> Option<Line> {
        let content = self.queued.pop_front()?;
        let line = Line::pending(self.kind, content);
        self.active = line.id();
        Some(line)
    }

    /// Drains every queued content as fully revealed lines.
    pub fn drain_revealed(&mut self) -> Vec<Line> {
        self.queued
            .drain(..)
            .map(|content| Line::revealed(self.kind, content))
            .collect()
    }
}
