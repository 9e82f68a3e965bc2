//! UI event types.
//!
//! Every external input (terminal, timers, async dispatch results) is turned
//! into a `UiEvent` before it reaches the reducer.
//!
//! ## Inbox Pattern
//!
//! Commands are resolved on a tokio task. The task sends
//! `UiEvent::CommandResolved` to the runtime's inbox, which is drained once
//! per loop iteration.

use crossterm::event::Event as CrosstermEvent;
use termfolio_core::commands::CommandResult;

use crate::clock::RevealBudget;

#[derive(Debug)]
pub enum UiEvent {
    /// Raw terminal input (keys, paste, resize).
    Terminal(CrosstermEvent),

    /// Frame cadence tick (drives the caret blink and redraws).
    Tick,

    /// Emitted first on every loop iteration with the current terminal size.
    Frame { width: u16, height: u16 },

    /// Reveal work that came due since the previous iteration.
    RevealDue(RevealBudget),

    /// A dispatched command finished resolving.
    CommandResolved { result: CommandResult },
}
