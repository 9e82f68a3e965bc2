//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer only mutates state; resolving commands, quitting and rebuilding
//! the session happen in the runtime.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Resolve an accepted command off the UI thread.
    Dispatch { input: String },

    /// Rebuild the session (and re-read the content file) from scratch.
    Reload,
}
