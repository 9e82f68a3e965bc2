//! Core termfolio library (segments, content, commands, session, reveal).
//!
//! Everything here is UI-agnostic: the TUI crate paints what the session
//! exposes and feeds key events back in.

pub mod commands;
pub mod config;
pub mod content;
pub mod line;
pub mod reveal;
pub mod segment;
pub mod session;
